use super::errors::ProcessError;

/// Validate a value passed as a process argument to prevent option injection.
///
/// Rejects empty values, values that start with `-`, and values containing
/// control characters.
pub fn validate_arg(value: &str, label: &str) -> Result<(), ProcessError> {
    if value.is_empty() {
        return Err(ProcessError::InvalidArgument {
            label: label.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if value.starts_with('-') {
        return Err(ProcessError::InvalidArgument {
            label: label.to_string(),
            message: format!("'{value}' must not start with '-'"),
        });
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(ProcessError::InvalidArgument {
            label: label.to_string(),
            message: "contains control characters".to_string(),
        });
    }
    Ok(())
}
