//! `${VAR}` and `${VAR:-default}` references in configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Replace every braced environment reference in `value`.
///
/// Text outside `${...}` is copied as is, so a bare `$name` in a URL or path
/// is left alone. An unterminated `${` is kept literally. `field` names the
/// config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&expand_reference(&rest[start..=start + len], field)?);
        rest = &rest[start + len + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn expand_reference<'a>(reference: &'a str, field: &str) -> Result<Cow<'a, str>, ConfigError> {
    shellexpand::env_with_context(reference, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        var: e.cause.0,
    })
}

struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    // SAFETY (all tests): each test touches its own variable names.

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(expand_env("My Site", "site_name").unwrap(), "My Site");
        assert_eq!(expand_env("/$prefix", "base_path").unwrap(), "/$prefix");
        assert_eq!(expand_env("cost: ${oops", "site_name").unwrap(), "cost: ${oops");
    }

    #[test]
    fn test_set_variable() {
        unsafe { std::env::set_var("MOAT_EXPAND_HOST", "example.com") };

        let url = expand_env("https://${MOAT_EXPAND_HOST}/$ref", "links[0].url").unwrap();

        assert_eq!(url, "https://example.com/$ref");
        unsafe { std::env::remove_var("MOAT_EXPAND_HOST") };
    }

    #[test]
    fn test_default_for_unset_variable() {
        unsafe { std::env::remove_var("MOAT_EXPAND_UNSET") };

        let path = expand_env("${MOAT_EXPAND_UNSET:-/docs}", "base_path").unwrap();

        assert_eq!(path, "/docs");
    }

    #[test]
    fn test_unset_variable_is_error() {
        unsafe { std::env::remove_var("MOAT_EXPAND_MISSING") };

        let err = expand_env("x ${MOAT_EXPAND_MISSING} y", "links[2].url").unwrap_err();

        assert!(matches!(&err, ConfigError::EnvVar { field, var }
            if field == "links[2].url" && var == "MOAT_EXPAND_MISSING"));
    }
}
