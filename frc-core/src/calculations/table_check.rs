//! Administrative integrity check for IRRF bracket tables.
//!
//! The calculator itself is deliberately lenient: a table with gaps silently
//! yields zero tax for values that fall through, and overlaps resolve to the
//! first match. This validator exists so an administrator can audit a year's
//! table before it goes live; it is never consulted during calculation.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::IrrfBracket;

/// A structural problem found in a bracket table.
///
/// `index` refers to the position in the table as given (expected sorted
/// ascending by `min_value`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableDefect {
    /// The first bracket does not start at zero, leaving low values uncovered.
    DoesNotStartAtZero { first_min: Decimal },
    /// A bracket's `min_value` is not above its predecessor's.
    Unordered { index: usize },
    /// A bracket's range intersects its predecessor's.
    Overlap { index: usize },
    /// A bracket does not start one cent above its predecessor's end.
    Gap {
        index: usize,
        uncovered_from: Decimal,
        uncovered_to: Decimal,
    },
    /// A bracket other than the last is open-ended, shadowing everything after it.
    InnerOpenEnd { index: usize },
    /// The last bracket is bounded, leaving high values uncovered.
    BoundedTop { last_max: Decimal },
}

/// Reports every structural defect in a bracket table.
///
/// A well-formed table partitions `[0, ∞)`: it starts at zero, adjacent
/// bounds differ by exactly one cent and only the final bracket is
/// open-ended. An empty table reports no defects — "no table for this year"
/// is a legitimate state surfaced elsewhere.
pub fn validate_table(brackets: &[IrrfBracket]) -> Vec<TableDefect> {
    let cent = Decimal::new(1, 2);
    let mut defects = Vec::new();

    let Some(first) = brackets.first() else {
        return defects;
    };

    if first.min_value != Decimal::ZERO {
        defects.push(TableDefect::DoesNotStartAtZero {
            first_min: first.min_value,
        });
    }

    for (index, pair) in brackets.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        let index = index + 1;

        if next.min_value <= prev.min_value {
            defects.push(TableDefect::Unordered { index });
            continue;
        }

        let Some(prev_max) = prev.max_value else {
            defects.push(TableDefect::InnerOpenEnd { index: index - 1 });
            continue;
        };

        if next.min_value <= prev_max {
            defects.push(TableDefect::Overlap { index });
        } else if next.min_value - prev_max != cent {
            defects.push(TableDefect::Gap {
                index,
                uncovered_from: prev_max + cent,
                uncovered_to: next.min_value - cent,
            });
        }
    }

    if let Some(last_max) = brackets.last().and_then(|b| b.max_value) {
        defects.push(TableDefect::BoundedTop { last_max });
    }

    defects
}
