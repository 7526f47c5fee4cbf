use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Empty values count as missing, so `FOO=` in a `.env` file behaves the same
/// as an unset variable.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

/// Reads an optional environment variable. Unset and empty both map to `None`.
pub fn get_optional_env_var(name: &str) -> Option<String> {
    get_env_var(name).ok()
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn missing_variable_reports_its_name() {
        // SAFETY: serialized with every other env-mutating test in this crate.
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_VAR") };
        let err = get_env_var("SHARED_UTILS_TEST_VAR").unwrap_err();
        assert_eq!(err.to_string(), "Missing environment variable: SHARED_UTILS_TEST_VAR");
    }

    #[test]
    #[serial]
    fn blank_value_is_treated_as_missing() {
        // SAFETY: see above.
        unsafe { std::env::set_var("SHARED_UTILS_TEST_VAR", "  ") };
        assert!(get_env_var("SHARED_UTILS_TEST_VAR").is_err());
        assert_eq!(get_optional_env_var("SHARED_UTILS_TEST_VAR"), None);

        unsafe { std::env::set_var("SHARED_UTILS_TEST_VAR", "https://reviews.local") };
        assert_eq!(
            get_env_var("SHARED_UTILS_TEST_VAR").unwrap(),
            "https://reviews.local"
        );
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_VAR") };
    }
}
