pub mod error;
pub use error::{ApiError, ApiErrorKind, Detail};

pub mod iam;

#[cfg(feature = "client")]
pub mod client;
