//! Template interpolation for literal variable values
//!
//! Literal values support two kinds of substitution:
//! - `$VAR` or `${VAR}` - Environment variable substitution
//! - `{{.NAME}}` - Reference to an already-resolved variable
//!
//! Environment variables are substituted first, so `$` characters inside
//! referenced values are left alone.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::EnvError;

/// Matches `${VAR}`
static BRACKETED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Matches `$VAR` (variable names can't start with a digit)
static SIMPLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Matches `{{.NAME}}`, tolerating inner whitespace
static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Interpolate environment variables: $VAR or ${VAR}
///
/// Unset variables expand to an empty string.
///
/// # Examples
///
/// ```
/// use taskenv::config::interpolate::interpolate_env_vars;
///
/// std::env::set_var("TASKENV_DOC_VAR", "hello");
/// assert_eq!(interpolate_env_vars("Value: $TASKENV_DOC_VAR"), "Value: hello");
/// std::env::remove_var("TASKENV_DOC_VAR");
/// ```
pub fn interpolate_env_vars(s: &str) -> String {
    // Match ${VAR} first (explicit boundaries)
    let result = BRACKETED_RE
        .replace_all(s, |caps: &regex::Captures| lookup_env(&caps[1]))
        .to_string();

    SIMPLE_RE
        .replace_all(&result, |caps: &regex::Captures| lookup_env(&caps[1]))
        .to_string()
}

fn lookup_env(var: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| {
        tracing::debug!("Environment variable '{}' not set", var);
        String::new()
    })
}

/// Names referenced with `{{.NAME}}` in a template, in order of appearance
pub fn references(template: &str) -> Vec<String> {
    REFERENCE_RE
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Render a literal template for variable `name`
///
/// `lookup` returns the value of an already-resolved variable. A reference
/// that `lookup` can't satisfy is an error rather than an empty string.
pub fn render_template<'a, F>(name: &str, template: &str, lookup: F) -> Result<String, EnvError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let expanded = interpolate_env_vars(template);

    for reference in references(&expanded) {
        if lookup(&reference).is_none() {
            return Err(EnvError::UnknownReference {
                name: name.to_string(),
                reference,
            });
        }
    }

    Ok(REFERENCE_RE
        .replace_all(&expanded, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_default().to_string()
        })
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_interpolate_simple_env_var() {
        std::env::set_var("TASKENV_TEST_SIMPLE_VAR", "hello");

        let result = interpolate_env_vars("Value: $TASKENV_TEST_SIMPLE_VAR");
        assert_eq!(result, "Value: hello");

        std::env::remove_var("TASKENV_TEST_SIMPLE_VAR");
    }

    #[test]
    fn test_interpolate_bracketed_env_var() {
        std::env::set_var("TASKENV_TEST_BRACKET_VAR", "world");

        let result = interpolate_env_vars("Value: ${TASKENV_TEST_BRACKET_VAR}!");
        assert_eq!(result, "Value: world!");

        std::env::remove_var("TASKENV_TEST_BRACKET_VAR");
    }

    #[test]
    fn test_interpolate_missing_var() {
        let result = interpolate_env_vars("Value: $NONEXISTENT_VAR_12345");
        assert_eq!(result, "Value: ");
    }

    #[test]
    fn test_interpolate_preserves_non_var_dollar() {
        let result = interpolate_env_vars("Price: $100");
        assert_eq!(result, "Price: $100");
    }

    #[test]
    fn test_references_in_order() {
        let refs = references("{{.NAMESPACE}}/{{ .GIT_PROJECT }}:{{.GIT_TAG_LATEST}}");
        assert_eq!(refs, vec!["NAMESPACE", "GIT_PROJECT", "GIT_TAG_LATEST"]);
    }

    #[test]
    fn test_render_template_with_references() {
        let env = vars(&[("NAMESPACE", "acme"), ("GIT_TAG_LATEST", "v1.2.0")]);

        let result = render_template("IMAGE", "{{.NAMESPACE}}/app:{{.GIT_TAG_LATEST}}", |k| {
            env.get(k).map(String::as_str)
        })
        .unwrap();

        assert_eq!(result, "acme/app:v1.2.0");
    }

    #[test]
    fn test_render_template_unknown_reference() {
        let env = vars(&[("NAMESPACE", "acme")]);

        let err = render_template("IMAGE", "{{.NAMESPACE}}:{{.LATER}}", |k| {
            env.get(k).map(String::as_str)
        })
        .unwrap_err();

        match err {
            EnvError::UnknownReference { name, reference } => {
                assert_eq!(name, "IMAGE");
                assert_eq!(reference, "LATER");
            }
            other => panic!("Expected UnknownReference, got {:?}", other),
        }
    }

    #[test]
    fn test_render_template_keeps_dollar_in_referenced_value() {
        let env = vars(&[("PRICE", "$HOME")]);

        let result =
            render_template("P", "cost={{.PRICE}}", |k| env.get(k).map(String::as_str)).unwrap();

        assert_eq!(result, "cost=$HOME");
    }

    #[test]
    fn test_render_template_plain_literal() {
        let result = render_template("DEVELOPER", "https://example.com", |_| None).unwrap();
        assert_eq!(result, "https://example.com");
    }
}
