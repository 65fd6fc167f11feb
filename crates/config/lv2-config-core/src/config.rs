//! Construction options for [`HostConfig`](crate::HostConfig).

use serde::{Deserialize, Serialize};

use crate::environment::REFERENCE_VARIABLE;

/// Options applied when a host configuration is created and loaded.
/// Evaluation semantics are fixed; these only control setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Environment entry seeded from the document's `referenceLevel`.
    pub reference_variable: String,

    /// Install the built-in function library into a new registry.
    pub builtins: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_variable: REFERENCE_VARIABLE.to_string(),
            builtins: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"builtins": false}"#).unwrap();
        assert_eq!(cfg.reference_variable, "reference");
        assert!(!cfg.builtins);
    }
}
