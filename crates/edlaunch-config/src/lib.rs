//! Configuration for edlaunch.

pub mod errors;
pub mod loading;
pub mod paths;
pub mod types;

pub use errors::ConfigError;
pub use loading::{load_config, load_config_from, parse_config, validate_config};
pub use paths::{CONFIG_FILE_ENV, EDITORS_FILE_ENV, LauncherPaths};
pub use types::{LaunchConfig, LauncherConfig, ResolverConfig, StoreConfig};
