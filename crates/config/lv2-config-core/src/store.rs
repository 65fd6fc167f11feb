//! The host configuration store: plugins, environment and function registry.
//!
//! Formatted text is the only durable form of a parameter. Resolved numbers are
//! derived by [`HostConfig::evaluate`] and are never written back out.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::coercion;
use crate::config::Config;
use crate::document::{self, RawDocument, RawPlugin};
use crate::environment::Environment;
use crate::error::{ConfigError, FunctionError};
use crate::expr;
use crate::functions::Function;
use crate::registry::FunctionRegistry;
use crate::value::Value;
use crate::Result;

/// One configured plugin: its URI, parameter texts and, after evaluation, their values.
///
/// Invariant: every resolved key is also a formatted key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginConfig {
    uri: String,
    formatted: IndexMap<String, String>,
    resolved: IndexMap<String, f64>,
}

impl PluginConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    fn from_raw(raw: RawPlugin) -> Self {
        Self {
            uri: raw.plugin_uri,
            formatted: raw.parameters,
            resolved: IndexMap::new(),
        }
    }

    fn to_raw(&self) -> RawPlugin {
        RawPlugin {
            plugin_uri: self.uri.clone(),
            parameters: self.formatted.clone(),
        }
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Parameter texts as written in the source document.
    #[inline]
    pub fn formatted(&self) -> &IndexMap<String, String> {
        &self.formatted
    }

    /// Values from the last successful evaluation.
    #[inline]
    pub fn resolved(&self) -> &IndexMap<String, f64> {
        &self.resolved
    }

    /// Override the value of an existing parameter in memory. The change never
    /// reaches the serialized form and is replaced by the next evaluation.
    /// Returns false, changing nothing, when `name` has no formatted text.
    pub fn set_resolved(&mut self, name: &str, value: f64) -> bool {
        if !self.formatted.contains_key(name) {
            return false;
        }
        self.resolved.insert(name.to_string(), value);
        true
    }

    #[inline]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.formatted.get(name).map(|s| s.as_str())
    }

    #[inline]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.resolved.get(name).copied()
    }

    /// Replace a parameter's text. Its resolved value is dropped until the next evaluation.
    pub fn set_formatted(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let name = name.into();
        self.resolved.shift_remove(&name);
        self.formatted.insert(name, text.into());
    }

    pub fn remove_parameter(&mut self, name: &str) -> Option<String> {
        self.resolved.shift_remove(name);
        self.formatted.shift_remove(name)
    }

    /// True when every formatted parameter has a resolved value.
    pub fn is_resolved(&self) -> bool {
        self.formatted.len() == self.resolved.len()
    }
}

/// Configuration store for an LV2 host.
///
/// Lifecycle: create (built-ins installed), optionally add variables and
/// functions, [`load`](Self::load), any number of [`evaluate`](Self::evaluate)
/// passes, and [`serialize`](Self::serialize) at any time.
///
/// Not synchronized; callers sharing a store across threads must serialize access.
#[derive(Debug, Clone)]
pub struct HostConfig {
    plugins: Arc<Vec<PluginConfig>>,
    environment: Environment,
    functions: FunctionRegistry,
    config: Config,
}

impl HostConfig {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let functions = if config.builtins {
            FunctionRegistry::new()
        } else {
            FunctionRegistry::empty()
        };
        Self {
            plugins: Arc::new(Vec::new()),
            environment: Environment::new(),
            functions,
            config,
        }
    }

    /// Builder-style variable binding.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.environment.set(name, value);
        self
    }

    /// Builder-style function registration.
    pub fn with_function(mut self, function: Box<dyn Function>) -> Self {
        self.functions.register(function);
        self
    }

    /// Replace all plugins with the document's, unevaluated, and seed the reference
    /// variable. A document without `referenceLevel` clears it.
    pub fn load(&mut self, doc: RawDocument) {
        let reference = &self.config.reference_variable;
        match doc.reference_level {
            Some(level) => {
                self.environment.set(reference.as_str(), level);
            }
            None => {
                self.environment.remove(reference);
            }
        }
        self.plugins = Arc::new(doc.plugins.into_iter().map(PluginConfig::from_raw).collect());
        debug!(
            "loaded {} plugin(s), reference level {:?}",
            self.plugins.len(),
            doc.reference_level
        );
    }

    pub fn load_str(&mut self, yaml: &str) -> Result<()> {
        let doc = document::from_yaml_str(yaml)?;
        self.load(doc);
        Ok(())
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let doc = document::read_file(path)?;
        debug!("read config {}", path.display());
        self.load(doc);
        Ok(())
    }

    /// Resolve every parameter of every plugin.
    ///
    /// All or nothing: a candidate plugin list is built from scratch and swapped in
    /// only when every parameter resolved. On error the live list is untouched and
    /// the first failure is returned.
    pub fn evaluate(&mut self) -> Result<()> {
        let candidate = self
            .plugins
            .iter()
            .map(|plugin| self.resolve_plugin(plugin))
            .collect::<Result<Vec<_>>>();

        match candidate {
            Ok(plugins) => {
                debug!("evaluated {} plugin(s)", plugins.len());
                self.plugins = Arc::new(plugins);
                Ok(())
            }
            Err(err) => {
                warn!("evaluation rolled back: {err}");
                Err(err)
            }
        }
    }

    fn resolve_plugin(&self, plugin: &PluginConfig) -> Result<PluginConfig> {
        let mut resolved = IndexMap::with_capacity(plugin.formatted.len());
        for (name, text) in &plugin.formatted {
            let value = expr::resolve(text, &self.environment, &self.functions).map_err(
                |source| ConfigError::Parameter {
                    plugin: plugin.uri.clone(),
                    parameter: name.clone(),
                    text: text.clone(),
                    source,
                },
            )?;
            trace!("{} {name} = {text:?} -> {value}", plugin.uri);
            resolved.insert(name.clone(), value);
        }
        Ok(PluginConfig {
            uri: plugin.uri.clone(),
            formatted: plugin.formatted.clone(),
            resolved,
        })
    }

    /// Raw document built from formatted text only.
    pub fn serialize(&self) -> RawDocument {
        RawDocument {
            reference_level: self
                .environment
                .get(&self.config.reference_variable)
                .and_then(|v| coercion::to_number(v).ok()),
            plugins: self.plugins.iter().map(PluginConfig::to_raw).collect(),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        document::to_yaml_string(&self.serialize())
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        document::write_file(&self.serialize(), path)
    }

    #[inline]
    pub fn plugins(&self) -> &[PluginConfig] {
        &self.plugins
    }

    /// Shared handle to the current plugin list. Evaluation replaces the list
    /// rather than mutating it, so a snapshot never changes underneath its holder.
    #[inline]
    pub fn snapshot(&self) -> Arc<Vec<PluginConfig>> {
        Arc::clone(&self.plugins)
    }

    /// First plugin with the given URI.
    pub fn plugin(&self, uri: &str) -> Option<&PluginConfig> {
        self.plugins.iter().find(|p| p.uri == uri)
    }

    /// Mutable access by position; copies the list first if a snapshot shares it.
    pub fn plugin_mut(&mut self, index: usize) -> Option<&mut PluginConfig> {
        Arc::make_mut(&mut self.plugins).get_mut(index)
    }

    /// Append a plugin. It has no resolved values until the next evaluation.
    pub fn add_plugin(&mut self, raw: RawPlugin) {
        Arc::make_mut(&mut self.plugins).push(PluginConfig::from_raw(raw));
    }

    /// Resolved value of `parameter` on the first plugin with `uri`.
    pub fn value(&self, uri: &str, parameter: &str) -> Option<f64> {
        self.plugin(uri).and_then(|p| p.value(parameter))
    }

    pub fn is_evaluated(&self) -> bool {
        self.plugins.iter().all(PluginConfig::is_resolved)
    }

    #[inline]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    #[inline]
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.environment.set(name, value);
    }

    #[inline]
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    #[inline]
    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    pub fn register_function(&mut self, function: Box<dyn Function>) {
        self.functions.register(function);
    }

    pub fn register_fn<F>(&mut self, name: impl Into<String>, arity: usize, func: F)
    where
        F: Fn(&[f64]) -> std::result::Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.functions.register_fn(name, arity, func);
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new()
    }
}
