//! Feature configuration loading and validation.

mod builder;
mod definition;
mod error;
mod file;

pub use builder::{
    home_config_dir, ConfigLoader, DEFAULT_FILE_NAMES, FEATURES_CONFIG_ENV, HOME_CONFIG_DIR,
};
pub use definition::{Configuration, ConfigurationBuilder, FactoryDefinition};
pub use error::ConfigError;
