//! The resolved environment of one invocation

use serde::Serialize;

use super::dotenv::ConfigInit;
use super::variable::Group;

/// Whether a value came from its derivation or from the declared fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Resolved,
    Fallback,
}

/// Value of one variable plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub value: String,
    pub origin: Origin,
}

impl Resolution {
    pub fn resolved(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: Origin::Resolved,
        }
    }

    pub fn fallback(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: Origin::Fallback,
        }
    }
}

/// One resolved variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    pub value: String,
    pub group: Group,
    pub origin: Origin,
}

/// Name → value mapping, kept in declaration order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedEnvironment {
    /// Outcome of the config file initialization, if it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<ConfigInit>,
    pub variables: Vec<Entry>,
}

impl ResolvedEnvironment {
    pub fn push(&mut self, name: impl Into<String>, group: Group, resolution: Resolution) {
        self.variables.push(Entry {
            name: name.into(),
            value: resolution.value,
            group,
            origin: resolution.origin,
        });
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.variables.iter().find(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entry(name).map(|e| e.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.variables.iter()
    }
}
