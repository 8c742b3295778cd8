pub mod competition;
pub mod export;
pub mod results;
pub mod score;
pub mod shooter;

use std::borrow::Cow;

use validator::ValidationError;

pub(crate) fn validation_error(
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(validation_error("blank", "Must not be blank"))
    } else {
        Ok(())
    }
}
