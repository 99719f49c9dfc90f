pub mod error;
pub mod types;

#[cfg(feature = "gifts")]
pub mod gifts;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "mortgage")]
pub mod config;

pub use error::HuisfinError;
pub use types::*;

/// Standard result type for all huisfin operations
pub type HuisfinResult<T> = Result<T, HuisfinError>;
