//! Report rendering
//!
//! - table: `NAME: value`, a blank line between groups
//! - json: the whole environment, with origins and the dot-env outcome
//! - plain: `NAME=value`, suitable for `eval` or a `.env` file

use colored::Colorize;

use crate::resolver::ResolvedEnvironment;

/// Human-readable report
pub fn render_table(env: &ResolvedEnvironment, color: bool) -> String {
    let mut out = String::new();
    let mut previous = None;

    for entry in env.iter() {
        if previous.is_some_and(|group| group != entry.group) {
            out.push('\n');
        }
        previous = Some(entry.group);

        let line = if color {
            format!("{}: {}\n", entry.name.cyan(), entry.value)
        } else {
            format!("{}: {}\n", entry.name, entry.value)
        };
        out.push_str(&line);
    }

    out
}

/// `NAME=value` lines; values containing whitespace or quotes are double-quoted
pub fn render_plain(env: &ResolvedEnvironment) -> String {
    let mut out = String::new();
    for entry in env.iter() {
        out.push_str(&format!("{}={}\n", entry.name, quote(&entry.value)));
    }
    out
}

fn quote(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '#' | '$' | '\\'));
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Pretty-printed JSON
pub fn render_json(env: &ResolvedEnvironment) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(env)
}
