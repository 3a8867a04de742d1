pub mod calculations;
pub mod db;
pub mod models;

pub use db::repository::{FundRepository, RepositoryError};
pub use models::*;
