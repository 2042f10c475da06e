use crate::error::GatehouseError;

/// Email and username are required on every write; blank values are rejected.
pub fn require_identity(email: &str, username: &str) -> Result<(), GatehouseError> {
    if email.trim().is_empty() || username.trim().is_empty() {
        return Err(GatehouseError::Validation(
            "Email and username are required".to_string(),
        ));
    }
    Ok(())
}
