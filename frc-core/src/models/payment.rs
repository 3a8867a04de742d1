use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Workflow stage of a disbursement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pago,
    Pendente,
    EmAndamento,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [Self::Pago, Self::Pendente, Self::EmAndamento];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pago => "PAGO",
            Self::Pendente => "PENDENTE",
            Self::EmAndamento => "EM ANDAMENTO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PAGO" => Some(Self::Pago),
            "PENDENTE" => Some(Self::Pendente),
            "EM ANDAMENTO" => Some(Self::EmAndamento),
            _ => None,
        }
    }
}

/// Nature of the disbursement as recorded in the payment history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryType {
    Repasse,
    RendaMinima,
    AjudaDeCusto,
    Dea,
    MesesAnteriores,
    Complementacao,
}

impl HistoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repasse => "REPASSE",
            Self::RendaMinima => "RENDA MINIMA",
            Self::AjudaDeCusto => "AJUDA DE CUSTO",
            Self::Dea => "DEA",
            Self::MesesAnteriores => "MESES ANTERIORES",
            Self::Complementacao => "COMPLEMENTAÇÃO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "REPASSE" => Some(Self::Repasse),
            "RENDA MINIMA" => Some(Self::RendaMinima),
            "AJUDA DE CUSTO" => Some(Self::AjudaDeCusto),
            "DEA" => Some(Self::Dea),
            "MESES ANTERIORES" => Some(Self::MesesAnteriores),
            "COMPLEMENTAÇÃO" => Some(Self::Complementacao),
            _ => None,
        }
    }
}

/// One disbursement to a notary office for a month/year reference.
///
/// `month_reference`/`year_reference` identify the period the payment covers,
/// which is distinct from `date` (the calendar day it was registered).
/// `month_reference` is kept as entered (`"1"` and `"01"` both occur); any
/// ordering over periods must go through [`crate::calculations::Period`].
///
/// Invariant: `net_value == gross_value - irrf_value`. The withholding is
/// computed once at registration time against that year's bracket table and
/// is not recomputed if the table later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub notary_id: i64,
    pub notary_name: String,
    pub code: String,
    pub responsible_name: String,
    pub cpf: String,
    pub comarca: String,
    pub date: NaiveDate,
    pub month_reference: String,
    pub year_reference: i32,
    pub gross_value: Decimal,
    pub irrf_value: Decimal,
    pub net_value: Decimal,
    pub history_type: HistoryType,
    pub status: PaymentStatus,
    pub pending_reason: Option<String>,
}

/// For registering new payments (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    pub notary_id: i64,
    pub notary_name: String,
    pub code: String,
    pub responsible_name: String,
    pub cpf: String,
    pub comarca: String,
    pub date: NaiveDate,
    pub month_reference: String,
    pub year_reference: i32,
    pub gross_value: Decimal,
    pub irrf_value: Decimal,
    pub net_value: Decimal,
    pub history_type: HistoryType,
    pub status: PaymentStatus,
    pub pending_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_round_trips_through_codes() {
        for status in PaymentStatus::ALL {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn status_rejects_unknown_code() {
        assert_eq!(PaymentStatus::parse("CANCELADO"), None);
    }

    #[test]
    fn history_type_round_trips_through_codes() {
        let all = [
            HistoryType::Repasse,
            HistoryType::RendaMinima,
            HistoryType::AjudaDeCusto,
            HistoryType::Dea,
            HistoryType::MesesAnteriores,
            HistoryType::Complementacao,
        ];
        for history in all {
            assert_eq!(HistoryType::parse(history.as_str()), Some(history));
        }
    }
}
