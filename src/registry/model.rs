//! Patient records and the field sets callers supply to create or change them

use serde::{Deserialize, Serialize};

/// Identity assigned by the store on creation.
pub type PatientId = u64;

/// A stored patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub age: i64,
    /// Opaque to the store; holds whatever the hashing collaborator produced.
    #[serde(skip_serializing)]
    pub secret: String,
}

/// Fields for a new patient.
///
/// There is no `id` field: a caller-supplied `id` in the request body is
/// ignored like any other unrecognized field. Missing fields default to
/// empty text and zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PatientDraft {
    pub name: String,
    pub age: i64,
    #[serde(alias = "password")]
    pub secret: String,
}

/// Fields for updating a patient. `name` and `age` always overwrite; an
/// empty `secret` leaves the stored one unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PatientPatch {
    pub name: String,
    pub age: i64,
    #[serde(alias = "password")]
    pub secret: String,
}

impl PatientDraft {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            age,
            secret: String::new(),
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }
}

impl PatientPatch {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            age,
            secret: String::new(),
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_ignores_id_and_unknown_fields() {
        let draft: PatientDraft = serde_json::from_value(json!({
            "id": 99,
            "name": "Ann Lee",
            "age": 30,
            "ward": "B"
        }))
        .unwrap();
        assert_eq!(draft, PatientDraft::new("Ann Lee", 30));
    }

    #[test]
    fn test_missing_fields_default() {
        let patch: PatientPatch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(patch, PatientPatch::default());
        assert!(patch.name.is_empty());
        assert_eq!(patch.age, 0);
    }

    #[test]
    fn test_password_alias() {
        let draft: PatientDraft =
            serde_json::from_value(json!({ "name": "Bo Kim", "password": "pw" })).unwrap();
        assert_eq!(draft.secret, "pw");
    }

    #[test]
    fn test_wrong_field_type_is_an_error() {
        let res: Result<PatientDraft, _> =
            serde_json::from_value(json!({ "name": "Bo Kim", "age": "forty" }));
        assert!(res.is_err());
    }

    #[test]
    fn test_secret_not_serialized() {
        let patient = Patient {
            id: 1,
            name: "Ann Lee".into(),
            age: 30,
            secret: "$argon2id$...".into(),
        };
        let value = serde_json::to_value(&patient).unwrap();
        assert_eq!(value, json!({ "id": 1, "name": "Ann Lee", "age": 30 }));
    }
}
