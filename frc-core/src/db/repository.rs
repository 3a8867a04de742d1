use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    IrrfBracket, NewIrrfBracket, NewNotary, NewPayment, Notary, Payment, PaymentStatus,
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Persistence collaborator for the fund's data.
///
/// The calculation core never touches this directly; callers fetch brackets,
/// notaries and payments through it and hand plain collections to the pure
/// functions in [`crate::calculations`].
#[async_trait]
pub trait FundRepository: Send + Sync {
    // IRRF bracket tables, one per calendar year.
    //
    // `get_brackets` returns the table ordered ascending by `min_value`. An
    // empty vec means no table was loaded for that year — not an error; the
    // calculator's zero fallback applies and the caller is expected to warn
    // the operator.
    async fn get_brackets(&self, year: i32) -> Result<Vec<IrrfBracket>, RepositoryError>;
    async fn list_bracket_years(&self) -> Result<Vec<i32>, RepositoryError>;
    async fn create_bracket(&self, bracket: NewIrrfBracket) -> Result<IrrfBracket, RepositoryError>;
    async fn update_bracket(&self, bracket: &IrrfBracket) -> Result<(), RepositoryError>;
    async fn delete_bracket(&self, id: i64) -> Result<(), RepositoryError>;
    async fn delete_brackets_for_year(&self, year: i32) -> Result<u64, RepositoryError>;

    // Notary offices.
    async fn get_notary(&self, id: i64) -> Result<Notary, RepositoryError>;
    async fn list_notaries(&self) -> Result<Vec<Notary>, RepositoryError>;
    async fn create_notary(&self, notary: NewNotary) -> Result<Notary, RepositoryError>;
    async fn update_notary(&self, notary: &Notary) -> Result<(), RepositoryError>;

    // Payments. Money fields are stored as assessed at registration time and
    // are never recomputed here.
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, RepositoryError>;
    async fn get_payment(&self, id: i64) -> Result<Payment, RepositoryError>;
    async fn list_payments(&self, year: Option<i32>) -> Result<Vec<Payment>, RepositoryError>;
    async fn list_payments_for_notary(
        &self,
        notary_id: i64,
    ) -> Result<Vec<Payment>, RepositoryError>;
    async fn update_payment_status(
        &self,
        id: i64,
        status: PaymentStatus,
        pending_reason: Option<String>,
    ) -> Result<(), RepositoryError>;
}
