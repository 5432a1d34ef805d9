use chrono::{NaiveDateTime, Timelike};
use std::fmt;

/// Display/input format for date-time fields.
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Used instead when the loaded value carries seconds, so they survive an edit.
pub const DATETIME_SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    Min(i64),
    Max(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    DateTime,
    /// One value out of a fixed list, cycled with left/right.
    Choice(&'static [&'static str]),
    /// Id of a team picked from the loaded team collection.
    TeamRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: &'static [Rule],
}

/// A failing rule, carrying the bound it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Required,
    MinLength(usize),
    Min(i64),
    Max(i64),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Required => write!(f, "This field is required"),
            Violation::MinLength(n) => write!(f, "Minimum length is {n} characters"),
            Violation::Min(n) => write!(f, "Minimum value is {n}"),
            Violation::Max(n) => write!(f, "Maximum value is {n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Untouched,
    Valid,
    Invalid(Violation),
}

impl FieldSpec {
    /// First violated rule, in declaration order. Numeric and date inputs
    /// that do not parse count as empty.
    pub fn check(&self, raw: &str) -> Option<Violation> {
        let value = raw.trim();
        let present = match self.kind {
            FieldKind::Integer => parse_integer(value).is_some(),
            FieldKind::DateTime => parse_datetime(value).is_some(),
            FieldKind::TeamRef => value.parse::<u32>().is_ok_and(|id| id > 0),
            FieldKind::Text | FieldKind::Choice(_) => !value.is_empty(),
        };

        for rule in self.rules {
            match *rule {
                Rule::Required if !present => return Some(Violation::Required),
                // Length/bound rules only apply to values that are there.
                Rule::MinLength(n) if present && value.chars().count() < n => {
                    return Some(Violation::MinLength(n));
                }
                Rule::Min(n) if parse_integer(value).is_some_and(|v| v < n) => {
                    return Some(Violation::Min(n));
                }
                Rule::Max(n) if parse_integer(value).is_some_and(|v| v > n) => {
                    return Some(Violation::Max(n));
                }
                _ => {}
            }
        }
        None
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }
}

pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Accepts `YYYY-MM-DD HH:MM`, the ISO `T` separator, and optional seconds.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub fn format_datetime(value: &NaiveDateTime) -> String {
    let format = if value.second() == 0 { DATETIME_INPUT_FORMAT } else { DATETIME_SECONDS_FORMAT };
    value.format(format).to_string()
}

// ---------------------------------------------------------------------------
// Form field state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FieldInput {
    pub spec: &'static FieldSpec,
    pub value: String,
    pub touched: bool,
}

impl FieldInput {
    pub fn status(&self) -> FieldStatus {
        if !self.touched {
            return FieldStatus::Untouched;
        }
        match self.spec.check(&self.value) {
            Some(v) => FieldStatus::Invalid(v),
            None => FieldStatus::Valid,
        }
    }

    /// Only touched fields surface their error.
    pub fn error_message(&self) -> Option<String> {
        match self.status() {
            FieldStatus::Invalid(v) => Some(v.to_string()),
            _ => None,
        }
    }
}

/// The validated field set behind a form.
#[derive(Debug, Clone)]
pub struct FieldSet {
    pub fields: Vec<FieldInput>,
}

impl FieldSet {
    pub fn new(specs: &'static [FieldSpec]) -> Self {
        Self {
            fields: specs
                .iter()
                .map(|spec| FieldInput { spec, value: String::new(), touched: false })
                .collect(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| f.spec.check(&f.value).is_none())
    }

    pub fn mark_all_touched(&mut self) {
        for field in &mut self.fields {
            field.touched = true;
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldInput> {
        self.fields.iter().find(|f| f.spec.key == key)
    }

    pub fn value(&self, key: &str) -> &str {
        self.get(key).map(|f| f.value.as_str()).unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.spec.key == key) {
            field.value = value.into();
        }
    }

    /// Overwrites values without touching anything, like loading a record.
    pub fn patch(&mut self, values: Vec<(&str, String)>) {
        for (key, value) in values {
            self.set(key, value);
        }
    }

    pub fn values(&self) -> Vec<(&'static str, String)> {
        self.fields.iter().map(|f| (f.spec.key, f.value.clone())).collect()
    }
}
