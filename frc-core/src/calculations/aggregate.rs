//! Aggregation of payment collections into dashboard figures.
//!
//! All functions here are pure reducers over in-memory payment slices; the
//! caller fetches the data and decides the window. Period ordering is the one
//! subtle point: `month_reference` is stored as entered (`"2"`, `"02"`,
//! `"10"`), so comparisons always go through the numeric [`Period`] value —
//! a lexicographic sort would place "10" before "2".

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Payment, PaymentStatus};

/// A `(year, month)` reference period, ordered numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Builds a period from a payment's reference fields.
    ///
    /// An unparsable month reference maps to month 0, which sorts before any
    /// real month of the same year rather than failing the aggregation.
    pub fn from_reference(
        year: i32,
        month_reference: &str,
    ) -> Self {
        Self {
            year,
            month: month_reference.trim().parse().unwrap_or(0),
        }
    }
}

impl From<&Payment> for Period {
    fn from(payment: &Payment) -> Self {
        Self::from_reference(payment.year_reference, &payment.month_reference)
    }
}

/// Presentation form, zero-padded: `02/2025`.
impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Gross and withheld totals for one reference period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub period: Period,
    pub gross: Decimal,
    pub irrf: Decimal,
}

/// Window over an already-grouped period series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    All,
    /// Keep only the trailing `n` periods.
    LastPeriods(usize),
    /// Keep only periods of one calendar year.
    Year(i32),
}

impl TimeRange {
    /// Applies the window to a series sorted ascending by period.
    pub fn apply(
        &self,
        series: Vec<PeriodTotals>,
    ) -> Vec<PeriodTotals> {
        match *self {
            TimeRange::All => series,
            TimeRange::LastPeriods(n) => {
                let skip = series.len().saturating_sub(n);
                series.into_iter().skip(skip).collect()
            }
            TimeRange::Year(year) => series
                .into_iter()
                .filter(|totals| totals.period.year == year)
                .collect(),
        }
    }
}

pub fn sum_gross(payments: &[Payment]) -> Decimal {
    payments.iter().map(|p| p.gross_value).sum()
}

pub fn sum_irrf(payments: &[Payment]) -> Decimal {
    payments.iter().map(|p| p.irrf_value).sum()
}

pub fn sum_net(payments: &[Payment]) -> Decimal {
    payments.iter().map(|p| p.net_value).sum()
}

/// Groups payments by reference period and totals gross/withheld per group.
///
/// The result is sorted ascending by `(year, month)`; groups that tie keep
/// their first-encounter order. Stored values are already rounded to cents,
/// so sums need no further rounding.
pub fn group_by_period(payments: &[Payment]) -> Vec<PeriodTotals> {
    let mut index: HashMap<Period, usize> = HashMap::new();
    let mut series: Vec<PeriodTotals> = Vec::new();

    for payment in payments {
        let period = Period::from(payment);
        let slot = *index.entry(period).or_insert_with(|| {
            series.push(PeriodTotals {
                period,
                gross: Decimal::ZERO,
                irrf: Decimal::ZERO,
            });
            series.len() - 1
        });
        series[slot].gross += payment.gross_value;
        series[slot].irrf += payment.irrf_value;
    }

    series.sort_by_key(|totals| totals.period);
    series
}

/// Share of payments per workflow status, as whole percentages.
///
/// Each percentage is rounded independently (half-up), so the three values
/// are not guaranteed to sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub pago: u32,
    pub pendente: u32,
    pub em_andamento: u32,
}

impl StatusDistribution {
    pub const ZERO: StatusDistribution = StatusDistribution {
        pago: 0,
        pendente: 0,
        em_andamento: 0,
    };

    pub fn percent(
        &self,
        status: PaymentStatus,
    ) -> u32 {
        match status {
            PaymentStatus::Pago => self.pago,
            PaymentStatus::Pendente => self.pendente,
            PaymentStatus::EmAndamento => self.em_andamento,
        }
    }
}

pub fn status_distribution(payments: &[Payment]) -> StatusDistribution {
    let total = payments.len() as u64;
    if total == 0 {
        return StatusDistribution::ZERO;
    }

    let share = |status: PaymentStatus| -> u32 {
        let count = payments.iter().filter(|p| p.status == status).count() as u64;
        // Integer half-up rounding of count/total × 100.
        ((count * 200 + total) / (total * 2)) as u32
    };

    StatusDistribution {
        pago: share(PaymentStatus::Pago),
        pendente: share(PaymentStatus::Pendente),
        em_andamento: share(PaymentStatus::EmAndamento),
    }
}
