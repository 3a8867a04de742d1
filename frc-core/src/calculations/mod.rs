//! Calculation core: withholding, payment aggregation and statement grouping.
//!
//! Everything in this module is pure — deterministic over its arguments, no
//! I/O, no ambient state — and safe to call from any execution context.

pub mod aggregate;
pub mod common;
pub mod statement;
pub mod table_check;
pub mod withholding;

pub use aggregate::{
    group_by_period, status_distribution, sum_gross, sum_irrf, sum_net, Period, PeriodTotals,
    StatusDistribution, TimeRange,
};
pub use statement::{group_for_statement, StatementGroup};
pub use table_check::{validate_table, TableDefect};
pub use withholding::{assess, calculate_withholding, Assessment, Withholding};
