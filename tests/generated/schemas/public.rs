// @generated by pg-typegen. Do not edit.
// declarations for namespace `public`
#![allow(non_snake_case, non_camel_case_types, dead_code, unused_imports, unused_mut, unused_variables)]

use pg_typegen::runtime as rt;

/// `public.address`
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub zipCode: i32,
    pub tags: Vec<String>,
}

/// `public.email`
///
/// `CHECK ((VALUE ~ '@'::text))`
pub type Email = String;

/// `public.mood`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    InProgress,
}

impl Mood {
    pub const ALL: &'static [Mood] = &[Mood::Happy, Mood::Sad, Mood::InProgress];

    /// The catalog label.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::InProgress => "in progress",
        }
    }
}

/// `public.person`
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub home: Address,
    pub moods: Vec<Mood>,
    pub contact: Email,
}

/// `public.users`
#[derive(Debug, Clone, PartialEq)]
pub struct Users {
    /// default `nextval('users_id_seq'::regclass)`
    pub id: rt::HasDefault<i32>,
    pub email: Email,
    pub address: Option<Address>,
    /// default `'{}'::address[]`
    pub previousAddresses: rt::HasDefault<Vec<Address>>,
    pub mood: Option<Mood>,
}

impl rt::Table for Users {
    const NAME: &'static str = "users";
    const NAMESPACED_NAME: &'static str = "public.users";
}

/// Tables of `public`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    pub users: Vec<Users>,
}

/// `(member, "namespace.table")` for every table above.
pub const TABLES: &[(&str, &str)] = &[
    ("users", "public.users"),
];
