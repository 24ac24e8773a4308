//! Input validation and sanitization for LDB
//!
//! Names and paths supplied by the operator end up in filesystem lookups and
//! shell command lines, so they are validated before use.

use crate::error::ValidationError;

/// Maximum length for directory names
pub const MAX_NAME_LENGTH: usize = 64;

/// Validate a backend directory name.
///
/// Backend directory names must:
/// - Be 1-64 characters long
/// - Contain only alphanumeric characters, underscores, hyphens, and dots
/// - Not contain path separators
///
/// # Examples
///
/// ```
/// use ldb_core::validation::validate_backend_dir_name;
///
/// assert!(validate_backend_dir_name("backend").is_ok());
/// assert!(validate_backend_dir_name("api-server").is_ok());
/// assert!(validate_backend_dir_name("").is_err());
/// assert!(validate_backend_dir_name("../etc").is_err());
/// ```
pub fn validate_backend_dir_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::InvalidNameLength(0));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidNameLength(name.len()));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(ValidationError::InvalidNameCharacters);
    }

    // "." and ".." resolve to other directories, never a backend dir
    if name.chars().all(|c| c == '.') {
        return Err(ValidationError::InvalidNameCharacters);
    }

    Ok(())
}

/// Sanitize a string for safe shell usage.
///
/// This function:
/// - Rejects strings containing null bytes
/// - Uses shell_escape for proper escaping
///
/// # Examples
///
/// ```
/// use ldb_core::validation::sanitize_for_shell;
///
/// assert!(sanitize_for_shell("hello world").is_ok());
/// assert!(sanitize_for_shell("hello\0world").is_err());
/// ```
pub fn sanitize_for_shell(input: &str) -> Result<String, ValidationError> {
    if input.contains('\0') {
        return Err(ValidationError::NullByteInInput);
    }

    Ok(shell_escape::escape(input.into()).to_string())
}

/// Validate that a string is not empty.
pub fn validate_not_empty(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_backend_dir_name_valid() {
        assert!(validate_backend_dir_name("backend").is_ok());
        assert!(validate_backend_dir_name("api-server").is_ok());
        assert!(validate_backend_dir_name("srv_2").is_ok());
        assert!(validate_backend_dir_name("app.v2").is_ok());
        assert!(validate_backend_dir_name("a").is_ok());
    }

    #[test]
    fn test_validate_backend_dir_name_empty() {
        let err = validate_backend_dir_name("").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidNameLength(0)));
    }

    #[test]
    fn test_validate_backend_dir_name_too_long() {
        let long_name = "a".repeat(65);
        let err = validate_backend_dir_name(&long_name).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidNameLength(65)));
    }

    #[test]
    fn test_validate_backend_dir_name_invalid_characters() {
        // Path traversal and shell metacharacters must be rejected
        assert!(validate_backend_dir_name("a/b").is_err());
        assert!(validate_backend_dir_name("..").is_err());
        assert!(validate_backend_dir_name(".").is_err());
        assert!(validate_backend_dir_name("name; rm -rf /").is_err());
        assert!(validate_backend_dir_name("name$(whoami)").is_err());
        assert!(validate_backend_dir_name("name with spaces").is_err());
        assert!(validate_backend_dir_name("name\nnewline").is_err());
    }

    #[test]
    fn test_sanitize_for_shell_valid() {
        assert!(sanitize_for_shell("hello world").is_ok());
        assert!(sanitize_for_shell("/tmp/logs/app.log").is_ok());
    }

    #[test]
    fn test_sanitize_for_shell_null_byte() {
        let err = sanitize_for_shell("hello\0world").unwrap_err();
        assert!(matches!(err, ValidationError::NullByteInInput));
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("hello").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
        assert!(validate_not_empty("\t\n").is_err());
    }
}
