//! Built-in type identifiers and their decoder classes.
//!
//! A static table: every identifier the primitive decoder knows maps to a
//! [`Primitive`] handler, either directly or as an "array of" that handler.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Text,
    Int,
    BigInt,
    Bool,
    Bytes,
    Date,
    Timestamp,
    TimestampTz,
    Json,
    Box,
    Circle,
    Line,
    LineSegment,
    Path,
    Point,
    Polygon,
    Tid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Scalar(Primitive),
    Array(Primitive),
}

pub const BOOL: u32 = 16;
pub const BYTEA: u32 = 17;
pub const CHAR: u32 = 18;
pub const NAME: u32 = 19;
pub const INT8: u32 = 20;
pub const INT2: u32 = 21;
pub const INT4: u32 = 23;
pub const REGPROC: u32 = 24;
pub const TEXT: u32 = 25;
pub const OID: u32 = 26;
pub const TID: u32 = 27;
pub const XID: u32 = 28;
pub const JSON: u32 = 114;
pub const JSON_ARRAY: u32 = 199;
pub const POINT: u32 = 600;
pub const LSEG: u32 = 601;
pub const PATH: u32 = 602;
pub const BOX: u32 = 603;
pub const POLYGON: u32 = 604;
pub const LINE: u32 = 628;
pub const LINE_ARRAY: u32 = 629;
pub const CIDR: u32 = 650;
pub const CIDR_ARRAY: u32 = 651;
pub const FLOAT4: u32 = 700;
pub const FLOAT8: u32 = 701;
pub const CIRCLE: u32 = 718;
pub const CIRCLE_ARRAY: u32 = 719;
pub const MACADDR: u32 = 829;
pub const INET: u32 = 869;
pub const BOOL_ARRAY: u32 = 1000;
pub const BYTEA_ARRAY: u32 = 1001;
pub const CHAR_ARRAY: u32 = 1002;
pub const NAME_ARRAY: u32 = 1003;
pub const INT2_ARRAY: u32 = 1005;
pub const INT4_ARRAY: u32 = 1007;
pub const REGPROC_ARRAY: u32 = 1008;
pub const TEXT_ARRAY: u32 = 1009;
pub const TID_ARRAY: u32 = 1010;
pub const XID_ARRAY: u32 = 1011;
pub const BPCHAR_ARRAY: u32 = 1014;
pub const VARCHAR_ARRAY: u32 = 1015;
pub const INT8_ARRAY: u32 = 1016;
pub const POINT_ARRAY: u32 = 1017;
pub const LSEG_ARRAY: u32 = 1018;
pub const PATH_ARRAY: u32 = 1019;
pub const BOX_ARRAY: u32 = 1020;
pub const FLOAT4_ARRAY: u32 = 1021;
pub const FLOAT8_ARRAY: u32 = 1022;
pub const POLYGON_ARRAY: u32 = 1027;
pub const OID_ARRAY: u32 = 1028;
pub const MACADDR_ARRAY: u32 = 1040;
pub const INET_ARRAY: u32 = 1041;
pub const BPCHAR: u32 = 1042;
pub const VARCHAR: u32 = 1043;
pub const DATE: u32 = 1082;
pub const TIME: u32 = 1083;
pub const TIMESTAMP: u32 = 1114;
pub const TIMESTAMP_ARRAY: u32 = 1115;
pub const DATE_ARRAY: u32 = 1182;
pub const TIME_ARRAY: u32 = 1183;
pub const TIMESTAMPTZ: u32 = 1184;
pub const TIMESTAMPTZ_ARRAY: u32 = 1185;
pub const NUMERIC_ARRAY: u32 = 1231;
pub const TIMETZ: u32 = 1266;
pub const TIMETZ_ARRAY: u32 = 1270;
pub const NUMERIC: u32 = 1700;
pub const REGPROCEDURE: u32 = 2202;
pub const REGOPER: u32 = 2203;
pub const REGOPERATOR: u32 = 2204;
pub const REGCLASS: u32 = 2205;
pub const REGTYPE: u32 = 2206;
pub const REGPROCEDURE_ARRAY: u32 = 2207;
pub const REGOPER_ARRAY: u32 = 2208;
pub const REGOPERATOR_ARRAY: u32 = 2209;
pub const REGCLASS_ARRAY: u32 = 2210;
pub const REGTYPE_ARRAY: u32 = 2211;
pub const UUID: u32 = 2950;
pub const UUID_ARRAY: u32 = 2951;
pub const REGCONFIG: u32 = 3734;
pub const REGCONFIG_ARRAY: u32 = 3735;
pub const REGDICTIONARY: u32 = 3769;
pub const REGDICTIONARY_ARRAY: u32 = 3770;
pub const JSONB: u32 = 3802;
pub const JSONB_ARRAY: u32 = 3807;
pub const REGNAMESPACE: u32 = 4089;
pub const REGNAMESPACE_ARRAY: u32 = 4090;
pub const REGROLE: u32 = 4096;
pub const REGROLE_ARRAY: u32 = 4097;

/// Decoder class for a type identifier; `None` means "pass the text through".
pub fn classify(type_id: u32) -> Option<TypeClass> {
    use Primitive as P;
    use TypeClass::{Array, Scalar};

    let class = match type_id {
        BPCHAR | CHAR | CIDR | FLOAT4 | FLOAT8 | INET | MACADDR | NAME | NUMERIC | OID | REGCLASS
        | REGCONFIG | REGDICTIONARY | REGNAMESPACE | REGOPER | REGOPERATOR | REGPROC | REGPROCEDURE
        | REGROLE | REGTYPE | TEXT | TIME | TIMETZ | UUID | VARCHAR => Scalar(P::Text),
        BPCHAR_ARRAY | CHAR_ARRAY | CIDR_ARRAY | FLOAT4_ARRAY | FLOAT8_ARRAY | INET_ARRAY
        | MACADDR_ARRAY | NAME_ARRAY | NUMERIC_ARRAY | OID_ARRAY | REGCLASS_ARRAY | REGCONFIG_ARRAY
        | REGDICTIONARY_ARRAY | REGNAMESPACE_ARRAY | REGOPER_ARRAY | REGOPERATOR_ARRAY
        | REGPROC_ARRAY | REGPROCEDURE_ARRAY | REGROLE_ARRAY | REGTYPE_ARRAY | TEXT_ARRAY
        | TIME_ARRAY | TIMETZ_ARRAY | UUID_ARRAY | VARCHAR_ARRAY => Array(P::Text),

        INT2 | INT4 | XID => Scalar(P::Int),
        INT2_ARRAY | INT4_ARRAY | XID_ARRAY => Array(P::Int),
        INT8 => Scalar(P::BigInt),
        INT8_ARRAY => Array(P::BigInt),
        BOOL => Scalar(P::Bool),
        BOOL_ARRAY => Array(P::Bool),
        BYTEA => Scalar(P::Bytes),
        BYTEA_ARRAY => Array(P::Bytes),

        DATE => Scalar(P::Date),
        DATE_ARRAY => Array(P::Date),
        TIMESTAMP => Scalar(P::Timestamp),
        TIMESTAMP_ARRAY => Array(P::Timestamp),
        TIMESTAMPTZ => Scalar(P::TimestampTz),
        TIMESTAMPTZ_ARRAY => Array(P::TimestampTz),

        JSON | JSONB => Scalar(P::Json),
        JSON_ARRAY | JSONB_ARRAY => Array(P::Json),

        BOX => Scalar(P::Box),
        BOX_ARRAY => Array(P::Box),
        CIRCLE => Scalar(P::Circle),
        CIRCLE_ARRAY => Array(P::Circle),
        LINE => Scalar(P::Line),
        LINE_ARRAY => Array(P::Line),
        LSEG => Scalar(P::LineSegment),
        LSEG_ARRAY => Array(P::LineSegment),
        PATH => Scalar(P::Path),
        PATH_ARRAY => Array(P::Path),
        POINT => Scalar(P::Point),
        POINT_ARRAY => Array(P::Point),
        POLYGON => Scalar(P::Polygon),
        POLYGON_ARRAY => Array(P::Polygon),
        TID => Scalar(P::Tid),
        TID_ARRAY => Array(P::Tid),

        _ => return None,
    };
    Some(class)
}

/// Element delimiter in the array text for `type_id`; only `box[]` differs.
pub fn array_delimiter(type_id: u32) -> char {
    if type_id == BOX_ARRAY { ';' } else { ',' }
}

/// Element identifier for an "array of" identifier; other identifiers map to themselves.
pub fn element_type_id(type_id: u32) -> u32 {
    match type_id {
        BOOL_ARRAY => BOOL,
        BYTEA_ARRAY => BYTEA,
        CHAR_ARRAY => CHAR,
        NAME_ARRAY => NAME,
        INT2_ARRAY => INT2,
        INT4_ARRAY => INT4,
        REGPROC_ARRAY => REGPROC,
        TEXT_ARRAY => TEXT,
        TID_ARRAY => TID,
        XID_ARRAY => XID,
        BPCHAR_ARRAY => BPCHAR,
        VARCHAR_ARRAY => VARCHAR,
        INT8_ARRAY => INT8,
        POINT_ARRAY => POINT,
        LSEG_ARRAY => LSEG,
        PATH_ARRAY => PATH,
        BOX_ARRAY => BOX,
        FLOAT4_ARRAY => FLOAT4,
        FLOAT8_ARRAY => FLOAT8,
        POLYGON_ARRAY => POLYGON,
        OID_ARRAY => OID,
        MACADDR_ARRAY => MACADDR,
        INET_ARRAY => INET,
        CIDR_ARRAY => CIDR,
        LINE_ARRAY => LINE,
        CIRCLE_ARRAY => CIRCLE,
        JSON_ARRAY => JSON,
        JSONB_ARRAY => JSONB,
        DATE_ARRAY => DATE,
        TIME_ARRAY => TIME,
        TIMETZ_ARRAY => TIMETZ,
        TIMESTAMP_ARRAY => TIMESTAMP,
        TIMESTAMPTZ_ARRAY => TIMESTAMPTZ,
        NUMERIC_ARRAY => NUMERIC,
        UUID_ARRAY => UUID,
        REGPROCEDURE_ARRAY => REGPROCEDURE,
        REGOPER_ARRAY => REGOPER,
        REGOPERATOR_ARRAY => REGOPERATOR,
        REGCLASS_ARRAY => REGCLASS,
        REGTYPE_ARRAY => REGTYPE,
        REGCONFIG_ARRAY => REGCONFIG,
        REGDICTIONARY_ARRAY => REGDICTIONARY,
        REGNAMESPACE_ARRAY => REGNAMESPACE,
        REGROLE_ARRAY => REGROLE,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_array_identifier_shares_its_element_primitive() {
        for id in [TEXT_ARRAY, INT4_ARRAY, INT8_ARRAY, BOOL_ARRAY, DATE_ARRAY, JSONB_ARRAY, POINT_ARRAY, TID_ARRAY] {
            let Some(TypeClass::Array(primitive)) = classify(id) else {
                panic!("{id} is not an array identifier");
            };
            assert_eq!(classify(element_type_id(id)), Some(TypeClass::Scalar(primitive)));
        }
    }

    #[test]
    fn unknown_identifiers_are_unclassified() {
        assert_eq!(classify(9_999_999), None);
        assert_eq!(element_type_id(9_999_999), 9_999_999);
    }
}
