//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Bare `$VAR` is never expanded.

use std::env::VarError;

use crate::ConfigError;

/// Expand `${VAR}` references in `value`.
///
/// A variable holding non-UTF-8 data is an error even when a default is
/// given.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let input = escape_bare_dollars(value);
    let mut failed: Vec<(String, VarError)> = Vec::new();
    let expanded = shellexpand::env_with_context(&input, |var| match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(err) => {
            failed.push((var.to_owned(), err.clone()));
            Err(err)
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| env_var_error(field, &e.var_name, &e.cause))?;

    for (var, cause) in &failed {
        match cause {
            VarError::NotPresent => {
                tracing::warn!(field, var, "Environment variable not set, using default");
            }
            VarError::NotUnicode(_) => return Err(env_var_error(field, var, cause)),
        }
    }

    Ok(expanded)
}

fn env_var_error(field: &str, var: &str, cause: &VarError) -> ConfigError {
    let message = match cause {
        VarError::NotPresent => format!("${{{var}}} not set"),
        VarError::NotUnicode(_) => format!("${{{var}}} is not valid UTF-8"),
    };
    ConfigError::EnvVar {
        field: field.to_owned(),
        message,
    }
}

/// Double every `$` not followed by `{`, so only braced references expand.
fn escape_bare_dollars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '$' && chars.peek() != Some(&'{') {
            out.push('$');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PORTAL_TEST_SIMPLE", "intranet");
        }
        let result = expand_env("${PORTAL_TEST_SIMPLE}", "portal.name").unwrap();
        assert_eq!(result, "intranet");
        unsafe {
            std::env::remove_var("PORTAL_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PORTAL_TEST_UNSET");
        }
        let result = expand_env("${PORTAL_TEST_UNSET:-classic}", "portal.default_site").unwrap();
        assert_eq!(result, "classic");
    }

    #[test]
    fn test_expand_value_beats_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PORTAL_TEST_SET", "mobile");
        }
        let result = expand_env("${PORTAL_TEST_SET:-classic}", "portal.default_site").unwrap();
        assert_eq!(result, "mobile");
        unsafe {
            std::env::remove_var("PORTAL_TEST_SET");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PORTAL_TEST_MISSING");
        }
        let err = expand_env("site-${PORTAL_TEST_MISSING}", "portal.name").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("PORTAL_TEST_MISSING"));
        assert!(err.to_string().contains("portal.name"));
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_non_utf8_var_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PORTAL_TEST_BINARY", OsStr::from_bytes(&[0xff]));
        }
        for value in ["${PORTAL_TEST_BINARY}", "${PORTAL_TEST_BINARY:-classic}"] {
            let err = expand_env(value, "portal.default_site").unwrap_err();
            assert!(matches!(err, ConfigError::EnvVar { .. }));
            assert!(err.to_string().contains("PORTAL_TEST_BINARY"));
            assert!(err.to_string().contains("UTF-8"));
        }
        unsafe {
            std::env::remove_var("PORTAL_TEST_BINARY");
        }
    }

    #[test]
    fn test_bare_dollar_never_expanded() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PORTAL_TEST_BRACED", "v");
            std::env::set_var("PORTAL_TEST_BARE", "bare");
        }
        assert_eq!(
            expand_env("$PORTAL_TEST_BARE", "portal.name").unwrap(),
            "$PORTAL_TEST_BARE"
        );
        assert_eq!(
            expand_env("${PORTAL_TEST_BRACED}-$PORTAL_TEST_BARE", "portal.name").unwrap(),
            "v-$PORTAL_TEST_BARE"
        );
        assert_eq!(
            expand_env("$$${PORTAL_TEST_BRACED}$", "portal.name").unwrap(),
            "$$v$"
        );
        unsafe {
            std::env::remove_var("PORTAL_TEST_BRACED");
            std::env::remove_var("PORTAL_TEST_BARE");
        }
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("portal", "portal.name").unwrap(), "portal");
    }
}
