//! Patient registry
//!
//! - `store`: the mutex-guarded record map and identity counter
//! - `http`: request dispatch onto the store
//! - `server`: listener setup and shutdown

pub mod http;
pub mod model;
pub mod server;
pub mod store;

pub use model::{Patient, PatientDraft, PatientId, PatientPatch};
pub use server::RegistryServer;
pub use store::PatientStore;
