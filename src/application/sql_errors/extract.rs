//! Best-effort extraction of names and values from MySQL/MariaDB
//! diagnostic text
//!
//! These patterns are the only engine-specific part of classification.
//! A miss is normal and callers substitute a placeholder.

use once_cell::sync::Lazy;
use regex::Regex;

/// `Duplicate entry 'x' for key 'table.field'` -> `field`
static DUPLICATE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"for key '(?:[\w.]+\.)?(\w+)'").expect("valid regex"));

/// `Duplicate entry 'x' for key ...` -> `x`
static DUPLICATE_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Duplicate entry '(.+?)'").expect("valid regex"));

/// `... for column 'age'` (MySQL) or `` for column `db`.`t`.`age` `` (MariaDB)
static COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"column (?:`\w+`\.)*[`'](\w+)[`']").expect("valid regex"));

/// `Column 'title' cannot be null`
static NULL_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Column '(\w+)'").expect("valid regex"));

/// `Field 'slug' doesn't have a default value`
static FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"Field '(\w+)'").expect("valid regex"));

static FOREIGN_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"FOREIGN KEY \(`(\w+)`\)").expect("valid regex"));

static CONSTRAINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CONSTRAINT `(\w+)`").expect("valid regex"));

/// `Incorrect integer value: 'abc' for column ...`
static WRONG_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"value: '(.+?)'").expect("valid regex"));

fn capture<'a>(pattern: &Regex, text: Option<&'a str>) -> Option<&'a str> {
    pattern
        .captures(text?)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn duplicate_key(text: Option<&str>) -> Option<&str> {
    capture(&DUPLICATE_KEY, text)
}

pub fn duplicate_value(text: Option<&str>) -> Option<&str> {
    capture(&DUPLICATE_VALUE, text)
}

pub fn column(text: Option<&str>) -> Option<&str> {
    capture(&COLUMN, text)
}

pub fn null_column(text: Option<&str>) -> Option<&str> {
    capture(&NULL_COLUMN, text)
}

pub fn field(text: Option<&str>) -> Option<&str> {
    capture(&FIELD, text)
}

pub fn foreign_key(text: Option<&str>) -> Option<&str> {
    capture(&FOREIGN_KEY, text)
}

pub fn constraint(text: Option<&str>) -> Option<&str> {
    capture(&CONSTRAINT, text)
}

pub fn wrong_value(text: Option<&str>) -> Option<&str> {
    capture(&WRONG_VALUE, text)
}
