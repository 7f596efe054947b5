pub mod checks;
pub mod error;
pub mod ledger;
pub mod types;

#[cfg(feature = "aging")]
pub mod aging;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "risk")]
pub mod source;

pub use error::CariError;
pub use types::*;

/// Standard result type for all cari operations
pub type CariResult<T> = Result<T, CariError>;
