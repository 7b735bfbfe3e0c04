//! # minipatient
//!
//! An in-memory patient registry served over HTTP:
//! - One store object owning the record map and the identity counter
//! - Identities assigned from a counter seeded at 1, never reused
//! - All reads and writes serialized through a single lock inside the store
//! - The same CRUD routes mountable under any number of path prefixes
//!
//! Nothing is persisted: restarting the process clears every record.
//!
//! ## Usage
//!
//! ```bash
//! minipatient serve --bind 0.0.0.0:8080 --prefix /patients,/patients-dup
//!
//! curl -X POST localhost:8080/patients \
//!   -H 'content-type: application/json' \
//!   -d '{"name": "Ann Lee", "age": 30, "secret": "s3cret"}'
//! curl localhost:8080/patients/1
//! curl -X DELETE localhost:8080/patients/1
//! ```
//!
//! ## Embedding the store
//!
//! ```
//! use minipatient::{PatientDraft, PatientStore};
//!
//! let store = PatientStore::new();
//! let ann = store.create(PatientDraft::new("Ann Lee", 30));
//! assert_eq!(ann.id, 1);
//! assert_eq!(store.get(1).unwrap().name, "Ann Lee");
//! ```

pub mod common;
pub mod registry;

// Re-export commonly used types
pub use common::{Config, Error, Result};
pub use registry::{Patient, PatientDraft, PatientId, PatientPatch, PatientStore, RegistryServer};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
