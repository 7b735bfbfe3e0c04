//! Patient name validation

use crate::common::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// One or more capitalized words separated by single whitespace, e.g. "Ann Lee".
static PATIENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:\s[A-Z][a-z]+)*$").expect("patient name pattern is valid")
});

pub fn is_valid_patient_name(name: &str) -> bool {
    PATIENT_NAME.is_match(name)
}

pub fn validate_patient_name(name: &str) -> Result<()> {
    if is_valid_patient_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}
