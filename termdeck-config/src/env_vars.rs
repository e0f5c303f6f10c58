//! Environment variable substitution for the settings file.
//!
//! Only allowlisted variables (and `TERMDECK_*` / `LC_*` prefixed ones) are
//! resolved, so a shared settings file cannot pull arbitrary secrets out of
//! the environment.

use regex::Regex;
use std::sync::LazyLock;

/// Matches `${VAR_NAME}` or `${VAR_NAME:-default_value}`.
static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-((?:[^}\\]|\\.)*))?}")
        .expect("env-var substitution regex is a compile-time constant and must be valid")
});

/// Environment variables that are safe to substitute in the settings file.
pub const ALLOWED_ENV_VARS: &[&str] = &[
    "HOME",
    "USER",
    "USERNAME",
    "LOGNAME",
    "USERPROFILE",
    "SHELL",
    "LANG",
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "XDG_STATE_HOME",
    "TMPDIR",
    "TEMP",
    "TMP",
    "EDITOR",
    "VISUAL",
    "APPDATA",
    "LOCALAPPDATA",
];

pub fn is_env_var_allowed(var_name: &str) -> bool {
    ALLOWED_ENV_VARS.contains(&var_name)
        || var_name.starts_with("TERMDECK_")
        || var_name.starts_with("LC_")
}

/// Substitute `${VAR}` / `${VAR:-default}` in `input`.
///
/// Unset variables fall back to the default when one is given and are left
/// as written otherwise. `$${VAR}` produces a literal `${VAR}`.
pub fn substitute_variables(input: &str) -> String {
    let escaped_placeholder = "\x00ESC_DOLLAR\x00";
    let working = input.replace("$${", escaped_placeholder);

    let result = ENV_VAR_PATTERN.replace_all(&working, |caps: &regex::Captures| {
        let var_name = &caps[1];

        if !is_env_var_allowed(var_name) {
            log::warn!("Settings reference non-allowlisted environment variable ${{{var_name}}}, skipped");
            return caps[0].to_string();
        }

        match std::env::var(var_name) {
            Ok(val) => val,
            Err(_) => caps
                .get(2)
                .map(|m| m.as_str().replace("\\}", "}"))
                .unwrap_or_else(|| caps[0].to_string()),
        }
    });

    result.replace(escaped_placeholder, "${")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_used_for_unset_variable() {
        let out = substitute_variables("dir: ${TERMDECK_SURELY_UNSET_VAR:-/fallback}");
        assert_eq!(out, "dir: /fallback");
    }

    #[test]
    fn test_non_allowlisted_variable_is_left_alone() {
        let out = substitute_variables("key: ${SECRET_API_KEY}");
        assert_eq!(out, "key: ${SECRET_API_KEY}");
    }

    #[test]
    fn test_escaped_dollar() {
        let out = substitute_variables("literal: $${HOME}");
        assert_eq!(out, "literal: ${HOME}");
    }
}
