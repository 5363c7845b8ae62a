use std::fmt;

use thiserror::Error;

use crate::models::RawRecord;

/// Mandatory tyre fields checked before an entity is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MandatoryField {
    Name,
    Brand,
    Size,
    Price,
}

impl MandatoryField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name/pattern",
            Self::Brand => "brand",
            Self::Size => "size",
            Self::Price => "price",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    InvalidFormat,
    NotPositive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: MandatoryField,
    pub kind: ViolationKind,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.as_str();
        match self.kind {
            ViolationKind::Missing => write!(f, "{field}"),
            ViolationKind::InvalidFormat => write!(f, "{field} (invalid format)"),
            ViolationKind::NotPositive => write!(f, "{field} (must be > 0)"),
        }
    }
}

/// Every mandatory-field defect found in one listing, reported together.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Missing mandatory fields: {}. Data: {raw}", format_violations(.violations))]
pub struct AggregateFieldError {
    pub violations: Vec<FieldViolation>,
    pub raw: RawRecord,
}

impl AggregateFieldError {
    /// Names of the offending fields, in check order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn has_violation(&self, field: MandatoryField) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
