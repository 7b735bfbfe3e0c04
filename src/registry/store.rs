//! In-memory patient store
//!
//! The record map and the identity counter live behind one mutex and are only
//! ever changed together, so two creates can never observe the same counter
//! value. Every operation takes the lock for the in-memory work only; callers
//! get owned copies and never see the lock.

use crate::common::{Error, Result};
use crate::registry::model::{Patient, PatientDraft, PatientId, PatientPatch};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// First identity handed out by a fresh store.
pub const FIRST_PATIENT_ID: PatientId = 1;

struct Registry {
    patients: HashMap<PatientId, Patient>,
    /// Next identity to assign. Only ever increases.
    next_id: PatientId,
}

/// Authoritative mapping from identity to patient.
pub struct PatientStore {
    inner: Mutex<Registry>,
}

impl PatientStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Registry {
                patients: HashMap::new(),
                next_id: FIRST_PATIENT_ID,
            }),
        }
    }

    // No operation can panic between reading and writing the registry, so a
    // poisoned lock still guards a consistent map.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Assign the next identity to `draft`, store it, and return the stored record.
    pub fn create(&self, draft: PatientDraft) -> Patient {
        let patient = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id += 1;

            let patient = Patient {
                id,
                name: draft.name,
                age: draft.age,
                secret: draft.secret,
            };
            registry.patients.insert(id, patient.clone());
            patient
        };
        tracing::debug!(patient_id = patient.id, "patient created");
        patient
    }

    pub fn get(&self, id: PatientId) -> Result<Patient> {
        self.lock()
            .patients
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    /// All stored patients, in no particular order.
    pub fn list(&self) -> Vec<Patient> {
        self.lock().patients.values().cloned().collect()
    }

    /// Overwrite `name` and `age`; replace the secret only when the patch carries one.
    pub fn update(&self, id: PatientId, patch: PatientPatch) -> Result<Patient> {
        let updated = {
            let mut registry = self.lock();
            let patient = registry.patients.get_mut(&id).ok_or(Error::NotFound(id))?;

            patient.name = patch.name;
            patient.age = patch.age;
            if !patch.secret.is_empty() {
                patient.secret = patch.secret;
            }
            patient.clone()
        };
        tracing::debug!(patient_id = id, "patient updated");
        Ok(updated)
    }

    pub fn delete(&self, id: PatientId) -> Result<()> {
        self.lock()
            .patients
            .remove(&id)
            .ok_or(Error::NotFound(id))?;
        tracing::debug!(patient_id = id, "patient deleted");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PatientStore {
    fn default() -> Self {
        Self::new()
    }
}
