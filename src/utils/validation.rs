use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};

pub fn validate<T: Validate>(val: &T) -> Result<()> {
    val.validate()?;
    Ok(())
}

/// Returns the trimmed value of a required text field.
pub fn require<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Validation(format!("{} is required", field))),
    }
}

pub fn parse_id(field: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| Error::Validation(format!("{} is not a valid identifier", field)))
}

pub fn require_id(field: &str, value: Option<&str>) -> Result<Uuid> {
    parse_id(field, require(field, value)?)
}
