//! Common utilities and types shared across minipatient

pub mod config;
pub mod error;
pub mod secret;
pub mod tracing_middleware;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use secret::{Argon2Hasher, SecretHasher};
pub use validation::{is_valid_patient_name, validate_patient_name};
