//! Grouping for the year-end consolidated withholding statement (Cédula C).
//!
//! The statement is issued per responsible party, not per office: a person
//! who answers for several registry offices must receive one consolidated
//! document covering all of them. Fragmenting or duplicating that document
//! produces legally incorrect statements, so the CPF grouping here is the
//! load-bearing step of the report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::aggregate::{sum_gross, sum_irrf, sum_net};
use crate::calculations::Period;
use crate::{Notary, Payment};

/// One consolidated statement: a responsible party, every selected office
/// linked to them and every payment those offices received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementGroup {
    pub responsible_cpf: String,
    pub responsible_name: String,
    pub notaries: Vec<Notary>,
    pub payments: Vec<Payment>,
}

impl StatementGroup {
    pub fn total_gross(&self) -> Decimal {
        sum_gross(&self.payments)
    }

    pub fn total_irrf(&self) -> Decimal {
        sum_irrf(&self.payments)
    }

    pub fn total_net(&self) -> Decimal {
        sum_net(&self.payments)
    }
}

/// Partitions the selected offices by responsible CPF and attaches their
/// payments.
///
/// Groups come out in first-encounter order of the CPF within
/// `selected_notaries`. Within each group payments are sorted
/// chronologically: year reference, then numeric month reference, then
/// calendar date — several payments can share a period (corrections,
/// complementary lots), hence the third key.
pub fn group_for_statement(
    selected_notaries: &[Notary],
    payments: &[Payment],
) -> Vec<StatementGroup> {
    let mut groups: Vec<StatementGroup> = Vec::new();

    for notary in selected_notaries {
        let slot = match groups
            .iter()
            .position(|g| g.responsible_cpf == notary.responsible_cpf)
        {
            Some(slot) => slot,
            None => {
                groups.push(StatementGroup {
                    responsible_cpf: notary.responsible_cpf.clone(),
                    responsible_name: notary.responsible_name.clone(),
                    notaries: Vec::new(),
                    payments: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        group.notaries.push(notary.clone());
        group
            .payments
            .extend(payments.iter().filter(|p| p.notary_id == notary.id).cloned());
    }

    for group in &mut groups {
        group
            .payments
            .sort_by_key(|p| (Period::from(p), p.date));
    }

    groups
}
