use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

/// Hash a password using `Argon2id`.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a password against an `Argon2id` hash.
///
/// Returns `true` if the password matches, `false` otherwise.
///
/// # Errors
///
/// Returns an error if the hash format is invalid.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Validate password complexity rules.
///
/// Requirements: at least 8 characters with a lowercase letter, an uppercase
/// letter, a digit and a non-alphanumeric character; at most 128 characters.
///
/// # Errors
///
/// Returns a descriptive error message if validation fails.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters.".to_string());
    }
    if password.len() > 128 {
        return Err("Password must be at most 128 characters.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain a lowercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain an uppercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a digit.".to_string());
    }
    if password.chars().all(char::is_alphanumeric) {
        return Err("Password must contain a special character.".to_string());
    }
    Ok(())
}

/// Validate email format (basic check for `@` and non-empty parts).
///
/// # Errors
///
/// Returns a descriptive error message if the email is invalid.
pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err("Email is required.".to_string());
    }
    let parts: Vec<&str> = trimmed.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err("Invalid email format.".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Sup3r-secret").unwrap_or_default();
        assert!(verify_password("Sup3r-secret", &hash).unwrap_or(false));
        assert!(!verify_password("not-the-password", &hash).unwrap_or(true));
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password("Abcdef1!").is_ok());
        assert!(validate_password("short1!").is_err()); // too short
        assert!(validate_password("abcdefg1!").is_err()); // no uppercase
        assert!(validate_password("ABCDEFG1!").is_err()); // no lowercase
        assert!(validate_password("Abcdefgh!").is_err()); // no digit
        assert!(validate_password("Abcdefg1").is_err()); // no special char
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email("bob@example.com").is_ok());
        assert!(validate_email("bob@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("").is_err());
    }
}
