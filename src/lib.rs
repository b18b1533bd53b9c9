//! Configuration-driven service locator.
//!
//! A feature configuration names, for each abstraction, the registered factory
//! that builds its implementation and the arguments to build it with. Arguments
//! may reference properties (`$NAME`) supplied on the command line, in the
//! environment, or in a `.env` file. The [`ServiceLocator`] builds each
//! abstraction's implementation once and hands out the cached instance.

pub mod config;
mod error;
pub mod factory;
pub mod global;
pub mod locator;
pub mod property;

pub use config::{ConfigError, ConfigLoader, Configuration, FactoryDefinition};
pub use error::Error;
pub use factory::{
    ArgumentError, Arguments, BoxError, FactoryEntry, FactoryFn, FactoryRegistry, Instance,
    Interface, FACTORIES,
};
pub use locator::{ServiceLocator, ServiceLocatorBuilder};
pub use property::{PropertyError, PropertyResolver, PropertySource};
