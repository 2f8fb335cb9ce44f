pub mod animal_service;
pub mod feed_service;
pub mod financial_service;
pub mod health_service;
pub mod milk_service;
pub mod reproduction_service;

pub use animal_service::AnimalService;
pub use feed_service::FeedService;
pub use financial_service::FinancialService;
pub use health_service::HealthService;
pub use milk_service::MilkService;
pub use reproduction_service::ReproductionService;

use crate::domain::{RecordId, Species};
use crate::errors::FarmError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] FarmError),
    #[error("Animal {0} not found")]
    AnimalNotFound(RecordId),
    #[error("Gestation period not defined for species `{0}`")]
    GestationUnknown(Species),
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
pub(crate) mod test_support;
