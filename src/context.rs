//! Factory context: parameter lookup, raw params and the logging sink.
//!
//! Every transform factory receives a [`FactoryContext`]. It bundles three
//! collaborators supplied by the request layer:
//!
//! - [`FactoryContext::use_param`]: resolves a logical option name to its
//!   raw value, following the [`ParamAliases`] rule table.
//! - [`FactoryContext::manual_search_params`]: the untouched, multi-value
//!   [`SearchParams`] for factories that need low-level access.
//! - a [`Logger`] for diagnostics that must never change control flow.
//!
//! ## Alias resolution
//!
//! A logical option can be spelled several ways. Resolution order is the
//! canonical name first, then each alias in table order; the first key
//! present in the config wins:
//!
//! ```text
//! width:      width → w
//! saturation: saturation → sat (deprecated)
//! ```
//!
//! A value found through a deprecated alias is still used, and a warning
//! naming the replacement goes to the logger.

use crate::query::{SearchParams, TransformConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Diagnostic sink. Implementations must not fail or panic.
pub trait Logger: Sync {
    fn debug(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards to the `log` facade under the `querypix` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn debug(&self, message: &str) {
        log::debug!(target: "querypix", "{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!(target: "querypix", "{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Warn,
}

/// Keeps every message in memory, e.g. to echo warnings back in a response.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Messages at `level`, in emission order.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.push(LogLevel::Debug, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }
}

/// One accepted spelling of a logical option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alias {
    pub key: String,
    #[serde(default)]
    pub deprecated: bool,
}

impl Alias {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            deprecated: false,
        }
    }

    pub fn deprecated(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            deprecated: true,
        }
    }
}

/// Rule table from canonical option name to its aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamAliases {
    rules: BTreeMap<String, Vec<Alias>>,
}

impl ParamAliases {
    /// A table with no aliases: only canonical names resolve.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock alias table.
    pub fn builtin() -> Self {
        let mut aliases = Self::empty();
        aliases.add("width", Alias::new("w"));
        aliases.add("height", Alias::new("h"));
        aliases.add("rotate", Alias::deprecated("rotation"));
        aliases.add("brightness", Alias::deprecated("bright"));
        aliases.add("saturation", Alias::deprecated("sat"));
        aliases.add("kernel", Alias::deprecated("resample"));
        aliases
    }

    /// Append an alias for `canonical`. Earlier aliases take precedence.
    pub fn add(&mut self, canonical: impl Into<String>, alias: Alias) {
        self.rules.entry(canonical.into()).or_default().push(alias);
    }

    /// Replace the aliases of every canonical name present in `rules`.
    pub fn override_with(&mut self, rules: &BTreeMap<String, Vec<Alias>>) {
        for (canonical, aliases) in rules {
            self.rules.insert(canonical.clone(), aliases.clone());
        }
    }

    pub fn aliases_for(&self, canonical: &str) -> &[Alias] {
        self.rules.get(canonical).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rules(&self) -> &BTreeMap<String, Vec<Alias>> {
        &self.rules
    }
}

/// Read-only handle passed to every transform factory.
#[derive(Clone, Copy)]
pub struct FactoryContext<'a> {
    pub manual_search_params: &'a SearchParams,
    pub aliases: &'a ParamAliases,
    pub logger: &'a dyn Logger,
}

impl<'a> FactoryContext<'a> {
    pub fn new(
        manual_search_params: &'a SearchParams,
        aliases: &'a ParamAliases,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            manual_search_params,
            aliases,
            logger,
        }
    }

    /// Raw value for the logical option `name`, following aliases.
    pub fn use_param<'c>(&self, config: &'c TransformConfig, name: &str) -> Option<&'c str> {
        if let Some(value) = config.get(name) {
            return Some(value);
        }

        let alias = self
            .aliases
            .aliases_for(name)
            .iter()
            .find(|alias| config.contains(&alias.key))?;

        if alias.deprecated {
            self.logger.warn(&format!(
                "deprecated parameter `{}`, use `{}` instead",
                alias.key, name
            ));
        }
        config.get(&alias.key)
    }

    /// Report a present value that failed validation and was ignored.
    pub fn ignore_invalid(&self, name: &str, raw: Option<&str>) {
        if let Some(raw) = raw {
            self.logger
                .debug(&format!("ignoring invalid value {raw:?} for `{name}`"));
        }
    }
}

impl std::fmt::Debug for FactoryContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryContext")
            .field("manual_search_params", self.manual_search_params)
            .field("aliases", self.aliases)
            .finish_non_exhaustive()
    }
}
