//! lv2-config-core: declarative LV2 host configuration.
//!
//! A configuration document lists plugins by URI, each with string-valued
//! parameters. A parameter is either a float literal or an expression over a
//! shared [`Environment`] and [`FunctionRegistry`]. [`HostConfig`] loads the
//! document, resolves every parameter to a number in one all-or-nothing pass, and
//! serializes back the original text so expressions survive a round trip.
//!
//! ```no_run
//! use lv2_config::HostConfig;
//!
//! let mut config = HostConfig::new().with_variable("trim", -3.0);
//! config.load_file("host.yaml")?;
//! config.evaluate()?;
//! for plugin in config.plugins() {
//!     println!("{} {:?}", plugin.uri(), plugin.resolved());
//! }
//! # Ok::<(), lv2_config::ConfigError>(())
//! ```

pub mod coercion;
pub mod config;
pub mod document;
pub mod environment;
pub mod error;
pub mod expr;
pub mod functions;
pub mod registry;
pub mod store;
pub mod value;

pub use config::Config;
pub use document::{RawDocument, RawPlugin};
pub use environment::{Environment, REFERENCE_VARIABLE};
pub use error::{ConfigError, ErrorKind, ExprError, FunctionError};
pub use expr::{resolve, Expression};
pub use functions::{FnFunction, Function, DECIBEL_FLOOR};
pub use registry::FunctionRegistry;
pub use store::{HostConfig, PluginConfig};
pub use value::{Value, ValueKind};

/// Result type for host configuration operations
pub type Result<T> = core::result::Result<T, ConfigError>;
