use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotaryStatus {
    Ativo,
    Inativo,
}

impl NotaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ativo => "ATIVO",
            Self::Inativo => "INATIVO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ATIVO" => Some(Self::Ativo),
            "INATIVO" => Some(Self::Inativo),
            _ => None,
        }
    }
}

/// How the responsible party is linked to the office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponsibleRole {
    Titular,
    Interino,
    Interventor,
}

impl ResponsibleRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Titular => "Titular",
            Self::Interino => "Interino",
            Self::Interventor => "Interventor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Titular" => Some(Self::Titular),
            "Interino" => Some(Self::Interino),
            "Interventor" => Some(Self::Interventor),
            _ => None,
        }
    }
}

/// A civil-registry office supported by the fund.
///
/// `responsible_cpf` identifies the person currently accountable for the
/// office; the consolidated statement groups offices by this field, since one
/// person may answer for several offices. `default_role`/`linkage_date`
/// describe the current linkage and pre-fill new payment registrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notary {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub cns_code: String,
    pub responsible_name: String,
    pub responsible_cpf: String,
    pub comarca: String,
    pub status: NotaryStatus,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub cep: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub default_role: Option<ResponsibleRole>,
    pub linkage_date: Option<NaiveDate>,
}

/// For creating new offices (no id yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotary {
    pub name: String,
    pub code: String,
    pub cns_code: String,
    pub responsible_name: String,
    pub responsible_cpf: String,
    pub comarca: String,
    pub status: NotaryStatus,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub cep: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub default_role: Option<ResponsibleRole>,
    pub linkage_date: Option<NaiveDate>,
}
