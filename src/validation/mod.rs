//! Mandatory-field gate. All checks run; every failure is reported in one error.

use crate::error::{AggregateFieldError, FieldViolation, MandatoryField, ViolationKind};
use crate::models::{RawRecord, RawValue};

/// Mandatory fields that passed the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct MandatoryFields {
    pub name: String,
    pub brand: String,
    pub size: String,
    pub price: f64,
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: MandatoryField, kind: ViolationKind) {
        self.0.push(FieldViolation { field, kind });
    }

    fn require_text(
        &mut self,
        raw: &RawRecord,
        key: &str,
        field: MandatoryField,
    ) -> Option<String> {
        match raw.text(key) {
            Some(text) if !text.trim().is_empty() => Some(text),
            _ => {
                self.push(field, ViolationKind::Missing);
                None
            }
        }
    }

    fn require_price(&mut self, raw: &RawRecord) -> Option<f64> {
        let price = match raw.get("price") {
            None => return self.reject_price(ViolationKind::Missing),
            Some(RawValue::Text(text)) if text.is_empty() => {
                return self.reject_price(ViolationKind::Missing);
            }
            Some(RawValue::Text(text)) => match text.trim().parse::<f64>() {
                Ok(price) => price,
                Err(_) => return self.reject_price(ViolationKind::InvalidFormat),
            },
            Some(RawValue::Number(price)) => *price,
        };

        if !price.is_finite() {
            self.reject_price(ViolationKind::InvalidFormat)
        } else if price <= 0.0 {
            self.reject_price(ViolationKind::NotPositive)
        } else {
            Some(price)
        }
    }

    fn reject_price(&mut self, kind: ViolationKind) -> Option<f64> {
        self.push(MandatoryField::Price, kind);
        None
    }
}

pub fn validate(raw: &RawRecord) -> Result<MandatoryFields, AggregateFieldError> {
    let mut violations = Violations::default();

    let name = violations.require_text(raw, "pattern", MandatoryField::Name);
    let brand = violations.require_text(raw, "brand", MandatoryField::Brand);
    let size = violations.require_text(raw, "size", MandatoryField::Size);
    let price = violations.require_price(raw);

    match (name, brand, size, price) {
        (Some(name), Some(brand), Some(size), Some(price)) if violations.0.is_empty() => {
            Ok(MandatoryFields {
                name,
                brand,
                size,
                price,
            })
        }
        _ => Err(AggregateFieldError {
            violations: violations.0,
            raw: raw.clone(),
        }),
    }
}
