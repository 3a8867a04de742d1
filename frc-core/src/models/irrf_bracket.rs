use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One range of the progressive IRRF table for a calendar year.
///
/// Bounds are inclusive on both ends; `max_value` of `None` marks the
/// open-ended top bracket. `rate` applies to the full gross value (not
/// marginally) and `deduction` is subtracted afterwards, following the
/// simplified progressive formula `tax = gross × rate − deduction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrfBracket {
    pub id: i64,
    pub year: i32,
    pub min_value: Decimal,
    pub max_value: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}

/// For creating new brackets (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIrrfBracket {
    pub year: i32,
    pub min_value: Decimal,
    pub max_value: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}
