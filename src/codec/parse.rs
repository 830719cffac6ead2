//! Single pass recursive descent over the generic text encoding.
//!
//! Position based, no backtracking except the one documented fallback: a
//! token that starts like a number but does not end on a boundary is
//! re-read as an unquoted string (dates such as `2024-01-01` stay strings).

use super::value::{truncate, PgValue};
use super::CodecError;

const REMAINDER_PREVIEW: usize = 100;

/// Parse one value and reject anything left over.
pub fn parse_value(text: &str) -> Result<PgValue, CodecError> {
    let mut parser = Parser::new(text);
    let value = parser.value(Context::TopLevel)?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(CodecError::TrailingInput {
            index: parser.pos,
            remainder: truncate(parser.rest(), REMAINDER_PREVIEW),
        });
    }
    Ok(value)
}

/// Read array text for a built-in element type: unquoted elements stay
/// text (`{007}` keeps its zeros) and only a bare `NULL` is null. Elements
/// are split on `delimiter`, which is `;` for `box[]`.
pub fn parse_array_text(text: &str, delimiter: char) -> Result<PgValue, CodecError> {
    let mut parser = Parser::new(text);
    parser.skip_whitespace();
    match parser.peek() {
        Some('{') => {}
        Some(found) => return Err(CodecError::UnexpectedCharacter { found, index: parser.pos }),
        None => {
            return Err(CodecError::UnterminatedCollection {
                expected: '}',
                found: "end of input".to_string(),
            });
        }
    }
    let items = parser.text_array(delimiter)?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(CodecError::TrailingInput {
            index: parser.pos,
            remainder: truncate(parser.rest(), REMAINDER_PREVIEW),
        });
    }
    Ok(PgValue::Array(items))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Context {
    TopLevel,
    Array,
    Record,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

fn is_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c == ',' || c == ')' || c == '}' || c.is_whitespace(),
    }
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(c) if c == ',' || c.is_whitespace()) {
            self.bump();
        }
    }

    fn value(&mut self, ctx: Context) -> Result<PgValue, CodecError> {
        self.skip_whitespace();

        let Some(current) = self.peek() else {
            return Ok(self.unquoted(ctx));
        };

        match current {
            '"' => self.quoted().map(PgValue::Text),
            '{' => self.collection('}').map(PgValue::Array),
            '(' => self
                .collection(')')
                .map(|items| PgValue::Record(items.into_iter().collect())),
            _ if self.looks_numeric() => self.number(ctx),
            _ => {
                if let Some(keyword) = self.keyword() {
                    return Ok(keyword);
                }
                Ok(self.unquoted(ctx))
            }
        }
    }

    fn looks_numeric(&self) -> bool {
        let first = self.peek();
        let second = self.peek_nth(1);
        match first {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => matches!(second, Some(c) if c.is_ascii_digit()),
            Some('-') => matches!(second, Some(c) if c.is_ascii_digit() || c == '.'),
            _ => false,
        }
    }

    /// `true` / `false` / `null`, case-insensitive, only when a boundary follows.
    fn keyword(&mut self) -> Option<PgValue> {
        for (word, value) in [
            ("true", PgValue::Bool(true)),
            ("false", PgValue::Bool(false)),
            ("null", PgValue::Null),
        ] {
            let rest = self.rest();
            let Some(head) = rest.get(..word.len()) else { continue };
            if head.eq_ignore_ascii_case(word) && is_boundary(rest[word.len()..].chars().next()) {
                self.pos += word.len();
                return Some(value);
            }
        }
        None
    }

    fn quoted(&mut self) -> Result<String, CodecError> {
        self.bump(); // opening quote
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(CodecError::UnterminatedString { partial: out }),
                Some('\\') => match self.bump() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(CodecError::UnterminatedString { partial: out }),
                },
                Some('"') => {
                    // records double embedded quotes
                    if self.peek() == Some('"') {
                        self.bump();
                        out.push('"');
                    } else {
                        return Ok(out);
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn unquoted(&mut self, ctx: Context) -> PgValue {
        let start = self.pos;
        while !is_boundary(self.peek()) {
            self.bump();
        }
        let token = &self.src[start..self.pos];
        if token.is_empty() && ctx == Context::Record {
            return PgValue::Null;
        }
        PgValue::Text(token.to_string())
    }

    fn number(&mut self, ctx: Context) -> Result<PgValue, CodecError> {
        let start = self.pos;
        let mut is_float = false;
        let mut in_exponent = false;

        if self.peek() == Some('-') {
            self.bump();
        }

        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {}
                '.' => {
                    if is_float || in_exponent {
                        return Err(CodecError::MalformedNumber {
                            partial: self.src[start..self.pos].to_string(),
                            reason: "unexpected '.'",
                        });
                    }
                    is_float = true;
                }
                'e' | 'E' => {
                    if in_exponent {
                        return Err(CodecError::MalformedNumber {
                            partial: self.src[start..self.pos].to_string(),
                            reason: "multiple exponent markers",
                        });
                    }
                    is_float = true;
                    in_exponent = true;
                    self.bump();
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }

        if !is_boundary(self.peek()) {
            self.pos = start;
            return Ok(self.unquoted(ctx));
        }

        let literal = &self.src[start..self.pos];
        if !is_float {
            if let Ok(int) = literal.parse::<i64>() {
                return Ok(PgValue::Int(int));
            }
        }
        literal
            .parse::<f64>()
            .map(PgValue::Float)
            .map_err(|_| CodecError::MalformedNumber {
                partial: literal.to_string(),
                reason: "not a number",
            })
    }

    fn collection(&mut self, end: char) -> Result<Vec<PgValue>, CodecError> {
        self.bump(); // opening token
        let inner = if end == '}' { Context::Array } else { Context::Record };
        let mut items = Vec::new();
        // a record position was opened by a comma and not yet filled
        let mut pending = false;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Err(CodecError::UnterminatedCollection {
                        expected: end,
                        found: "end of input".to_string(),
                    });
                }
                Some(c) if c == end => {
                    self.bump();
                    if pending {
                        items.push(PgValue::Null);
                    }
                    return Ok(items);
                }
                Some(_) => {}
            }

            let item_start = self.pos;
            let value = self.value(inner)?;
            items.push(value);
            pending = match inner {
                Context::Record => self.record_separator(),
                _ => {
                    self.skip_separators();
                    false
                }
            };

            if self.pos == item_start {
                // nothing consumed and no separator: a stray closing token
                let found = self.peek().unwrap_or(end);
                if found != end {
                    return Err(CodecError::UnexpectedCharacter { found, index: self.pos });
                }
            }
        }
    }

    fn text_array(&mut self, delimiter: char) -> Result<Vec<PgValue>, CodecError> {
        self.bump(); // '{'
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(items);
        }
        loop {
            self.skip_whitespace();
            let item = match self.peek() {
                Some('{') => PgValue::Array(self.text_array(delimiter)?),
                Some('"') => PgValue::Text(self.quoted()?),
                _ => self.bare_element(delimiter),
            };
            items.push(item);

            self.skip_whitespace();
            match self.bump() {
                Some('}') => return Ok(items),
                Some(c) if c == delimiter => {}
                Some(found) => {
                    return Err(CodecError::UnexpectedCharacter {
                        found,
                        index: self.pos - found.len_utf8(),
                    });
                }
                None => {
                    return Err(CodecError::UnterminatedCollection {
                        expected: '}',
                        found: "end of input".to_string(),
                    });
                }
            }
        }
    }

    fn bare_element(&mut self, delimiter: char) -> PgValue {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == delimiter || c == '}' {
                break;
            }
            self.bump();
            if c == '\\' {
                if let Some(escaped) = self.bump() {
                    out.push(escaped);
                }
            } else {
                out.push(c);
            }
        }
        let token = out.trim_end();
        if token.eq_ignore_ascii_case("null") {
            PgValue::Null
        } else {
            PgValue::Text(token.to_string())
        }
    }

    /// Records keep one position per comma, so `(1,,2)` has a null in the middle.
    fn record_separator(&mut self) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.bump();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> PgValue {
        PgValue::Text(s.to_string())
    }

    fn record(values: Vec<PgValue>) -> PgValue {
        PgValue::Record(values.into_iter().collect())
    }

    #[test]
    fn rejects_unterminated_record() {
        assert!(matches!(
            parse_value(r#"("a", "b","#),
            Err(CodecError::UnterminatedCollection { expected: ')', .. })
        ));
    }

    #[test]
    fn rejects_unterminated_string() {
        assert_eq!(
            parse_value(r#"("a", "b"#),
            Err(CodecError::UnterminatedString { partial: "b".to_string() })
        );
    }

    #[test]
    fn parses_simple_strings() {
        assert_eq!(parse_value("hello").unwrap(), text("hello"));
        assert_eq!(parse_value("(hello world)").unwrap(), record(vec![text("hello"), text("world")]));
        assert_eq!(
            parse_value(r#"{hello "world"}"#).unwrap(),
            PgValue::Array(vec![text("hello"), text("world")])
        );
        assert_eq!(parse_value(r#""hello""#).unwrap(), text("hello"));
    }

    #[test]
    fn parses_integers_and_floats() {
        assert_eq!(
            parse_value("{1, 2.2, .3, 4e5, 5.67e+8}").unwrap(),
            PgValue::Array(vec![
                PgValue::Int(1),
                PgValue::Float(2.2),
                PgValue::Float(0.3),
                PgValue::Float(400000.0),
                PgValue::Float(567000000.0),
            ])
        );
    }

    #[test]
    fn parses_booleans_only_on_boundaries() {
        assert_eq!(
            parse_value("{true, fAlSe, TRUE1, TRUE, FALSE}").unwrap(),
            PgValue::Array(vec![
                PgValue::Bool(true),
                PgValue::Bool(false),
                text("TRUE1"),
                PgValue::Bool(true),
                PgValue::Bool(false),
            ])
        );
    }

    #[test]
    fn parses_nulls_only_on_boundaries() {
        assert_eq!(
            parse_value("{NULL, NULLA, ANULL, nULl, NULL}").unwrap(),
            PgValue::Array(vec![PgValue::Null, text("NULLA"), text("ANULL"), PgValue::Null, PgValue::Null])
        );
    }

    #[test]
    fn parses_nested_collections() {
        assert_eq!(
            parse_value(r#"{{"a", "b"}, {"c", "d"}}"#).unwrap(),
            PgValue::Array(vec![
                PgValue::Array(vec![text("a"), text("b")]),
                PgValue::Array(vec![text("c"), text("d")]),
            ])
        );
        assert_eq!(
            parse_value(r#"(("a", "b"), ("c", "d"))"#).unwrap(),
            record(vec![record(vec![text("a"), text("b")]), record(vec![text("c"), text("d")])])
        );
    }

    #[test]
    fn parses_complex_nested_structures() {
        let input = r#"("foo()\"{},", "bar", 1.23, {"string", 1, NULL, true}, ("nested()", NULL), true)"#;
        let expected = record(vec![
            text(r#"foo()"{},"#),
            text("bar"),
            PgValue::Float(1.23),
            PgValue::Array(vec![text("string"), PgValue::Int(1), PgValue::Null, PgValue::Bool(true)]),
            record(vec![text("nested()"), PgValue::Null]),
            PgValue::Bool(true),
        ]);
        assert_eq!(parse_value(input).unwrap(), expected);
    }

    #[test]
    fn second_decimal_point_is_an_error() {
        assert!(matches!(parse_value("{1.2.3}"), Err(CodecError::MalformedNumber { .. })));
        assert!(matches!(parse_value("1e5e3"), Err(CodecError::MalformedNumber { .. })));
    }

    #[test]
    fn numeric_prefix_without_boundary_stays_a_string() {
        assert_eq!(parse_value("(2024-01-01,12abc)").unwrap(), record(vec![text("2024-01-01"), text("12abc")]));
    }

    #[test]
    fn record_quotes_may_be_doubled() {
        assert_eq!(parse_value(r#"("say ""hi""",x)"#).unwrap(), record(vec![text(r#"say "hi""#), text("x")]));
    }

    #[test]
    fn empty_record_elements_are_null() {
        assert_eq!(parse_value("(,1)").unwrap(), record(vec![PgValue::Null, PgValue::Int(1)]));
        assert_eq!(parse_value("(1,)").unwrap(), record(vec![PgValue::Int(1), PgValue::Null]));
        assert_eq!(
            parse_value("(1,,2)").unwrap(),
            record(vec![PgValue::Int(1), PgValue::Null, PgValue::Int(2)])
        );
        assert_eq!(
            parse_value("(, ,)").unwrap(),
            record(vec![PgValue::Null, PgValue::Null, PgValue::Null])
        );
        assert_eq!(parse_value("()").unwrap(), record(vec![]));
    }

    #[test]
    fn array_text_keeps_unquoted_elements_as_text() {
        assert_eq!(
            parse_array_text("{007, 1.50,true,NULL,\"NULL\"}", ',').unwrap(),
            PgValue::Array(vec![text("007"), text("1.50"), text("true"), PgValue::Null, text("NULL")])
        );
        assert_eq!(
            parse_array_text("{{a,b},{c,d}}", ',').unwrap(),
            PgValue::Array(vec![
                PgValue::Array(vec![text("a"), text("b")]),
                PgValue::Array(vec![text("c"), text("d")]),
            ])
        );
        assert_eq!(parse_array_text("{}", ',').unwrap(), PgValue::Array(vec![]));
        assert_eq!(
            parse_array_text("{(1,1),(0,0);(2,2),(1,1)}", ';').unwrap(),
            PgValue::Array(vec![text("(1,1),(0,0)"), text("(2,2),(1,1)")])
        );
    }

    #[test]
    fn array_text_rejects_broken_input() {
        assert!(matches!(parse_array_text("{a,b", ','), Err(CodecError::UnterminatedCollection { .. })));
        assert!(matches!(parse_array_text("(a)", ','), Err(CodecError::UnexpectedCharacter { found: '(', .. })));
        assert!(matches!(parse_array_text("{a} b", ','), Err(CodecError::TrailingInput { .. })));
        assert!(matches!(parse_array_text(r#"{"a"x}"#, ','), Err(CodecError::UnexpectedCharacter { found: 'x', .. })));
    }

    #[test]
    fn trailing_input_is_reported() {
        let err = parse_value("{1} x").unwrap_err();
        assert_eq!(err, CodecError::TrailingInput { index: 4, remainder: "x".to_string() });
        assert_eq!(parse_value("{1}  ").unwrap(), PgValue::Array(vec![PgValue::Int(1)]));
    }

    #[test]
    fn stray_closing_token_is_rejected() {
        assert!(matches!(parse_value("{)}"), Err(CodecError::UnexpectedCharacter { found: ')', .. })));
    }
}
