//! Service lookup, instantiation and caching.

mod registry;

use std::any::type_name;
use std::sync::Arc;

use crate::config::{ConfigLoader, Configuration, FactoryDefinition};
use crate::factory::{Arguments, FactoryRegistry, Instance, Interface};
use crate::property::{resolve_value, PropertyResolver};
use crate::Error;

pub use registry::Registry;

/// Resolves abstractions to cached implementation instances.
///
/// Each abstraction is instantiated at most once per locator, on first request.
/// Later requests return the same instance without resolving properties again.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use di_locator::{Arguments, BoxError, Configuration, FactoryDefinition, FactoryRegistry};
/// use di_locator::{Instance, Interface, ServiceLocator};
///
/// pub trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// impl Interface for dyn Greeter {
///     const NAME: &'static str = "greeting.Greeter";
/// }
///
/// struct Polite(String);
///
/// impl Greeter for Polite {
///     fn greet(&self) -> String {
///         format!("Good day, {}", self.0)
///     }
/// }
///
/// fn polite(args: &Arguments) -> Result<Instance, BoxError> {
///     Ok(Instance::new::<dyn Greeter>(Arc::new(Polite(args.str("name")?.to_string()))))
/// }
///
/// let locator = ServiceLocator::builder()
///     .with_configuration(Configuration::from_features([(
///         "greeter",
///         FactoryDefinition::new("greeting.Polite", "greeting.Greeter")
///             .with_kwarg("name", "$USER_NAME=stranger"),
///     )])?)
///     .with_factories(FactoryRegistry::new().with("greeting.Polite", polite))
///     .build()?;
///
/// let greeter = locator.service::<dyn Greeter>()?;
/// println!("{}", greeter.greet());
/// # Ok::<(), di_locator::Error>(())
/// ```
#[derive(Debug)]
pub struct ServiceLocator {
    configuration: Configuration,
    factories: FactoryRegistry,
    properties: PropertyResolver,
    by_interface: Registry,
    by_name: Registry,
}

impl ServiceLocator {
    /// Creates a new builder for constructing a `ServiceLocator`.
    pub fn builder() -> ServiceLocatorBuilder {
        ServiceLocatorBuilder::default()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    /// Returns the instance implementing `I`, creating it on first request.
    pub fn service<I>(&self) -> Result<Arc<I>, Error>
    where
        I: ?Sized + Interface,
    {
        let instance = self.service_by_interface(I::NAME)?;
        downcast::<I>(&instance, I::NAME)
    }

    /// Returns the instance for an abstraction identifier, creating it on first request.
    ///
    /// When several definitions implement the abstraction, the one marked
    /// default is used.
    pub fn service_by_interface(&self, interface: &str) -> Result<Instance, Error> {
        if let Some(instance) = self.by_interface.get(interface) {
            return Ok(instance);
        }

        let (feature, definition) = self.select(interface)?;
        let instance = self.instantiate(feature, definition)?;
        Ok(self.store(Some(interface), feature, instance))
    }

    /// Returns the instance of a named feature, creating it on first request.
    ///
    /// When the feature is the one its abstraction resolves to, this is the
    /// same instance [`service`](Self::service) returns. Other features get
    /// their own instance.
    pub fn service_by_name<I>(&self, feature: &str) -> Result<Arc<I>, Error>
    where
        I: ?Sized + 'static,
    {
        let instance = match self.by_name.get(feature) {
            Some(instance) => instance,
            None => self.create_by_name(feature)?,
        };
        downcast::<I>(&instance, feature)
    }

    fn create_by_name(&self, feature: &str) -> Result<Instance, Error> {
        let definition = self
            .configuration
            .feature_default(feature)
            .ok_or_else(|| Error::FeatureNotFound(feature.to_string()))?;

        let interface = self
            .is_selected(feature, definition)
            .then_some(definition.interface_ref.as_str());
        if let Some(instance) = interface.and_then(|i| self.by_interface.get(i)) {
            return Ok(self.by_name.get_or_insert(feature, instance));
        }

        let instance = self.instantiate(feature, definition)?;
        Ok(self.store(interface, feature, instance))
    }

    /// Whether `definition` is what a lookup of its abstraction selects.
    fn is_selected(&self, feature: &str, definition: &FactoryDefinition) -> bool {
        matches!(
            self.select(&definition.interface_ref),
            Ok((selected, candidate)) if selected == feature && std::ptr::eq(candidate, definition)
        )
    }

    /// Caches a new instance under its feature name and, if given, its
    /// abstraction. Another thread may have finished first; the instance
    /// already cached is returned instead.
    fn store(&self, interface: Option<&str>, feature: &str, instance: Instance) -> Instance {
        match interface {
            Some(interface) => {
                let cached = self.by_interface.get_or_insert(interface, instance);
                self.by_name.get_or_insert(feature, cached.clone());
                cached
            }
            None => self.by_name.get_or_insert(feature, instance),
        }
    }

    /// Whether an instance for the abstraction identifier has been created.
    pub fn is_cached(&self, interface: &str) -> bool {
        self.by_interface.contains(interface)
    }

    /// Substitutes property references in a definition's arguments.
    pub fn resolve_arguments(&self, definition: &FactoryDefinition) -> Result<Arguments, Error> {
        let args = definition
            .args
            .iter()
            .map(|value| resolve_value(value, &self.properties))
            .collect::<Result<Vec<_>, _>>()?;

        let mut kwargs = std::collections::BTreeMap::new();
        for (name, value) in &definition.kwargs {
            kwargs.insert(name.clone(), resolve_value(value, &self.properties)?);
        }

        Ok(Arguments::new(args, kwargs))
    }

    /// Picks the definition to use for an abstraction.
    fn select<'a>(&'a self, interface: &str) -> Result<(&'a str, &'a FactoryDefinition), Error> {
        let candidates: Vec<_> = self.configuration.candidates(interface).collect();

        match candidates.as_slice() {
            [] => Err(Error::NoImplementation {
                interface: interface.to_string(),
            }),
            [only] => Ok(*only),
            many => {
                let defaults: Vec<_> = many.iter().filter(|(_, d)| d.is_default).collect();
                match defaults.as_slice() {
                    [selected] => Ok(**selected),
                    _ => Err(Error::AmbiguousDefault {
                        interface: interface.to_string(),
                        features: many.iter().map(|(name, _)| name.to_string()).collect(),
                        defaults: defaults.len(),
                    }),
                }
            }
        }
    }

    fn instantiate(&self, feature: &str, definition: &FactoryDefinition) -> Result<Instance, Error> {
        if definition.has_property_references() {
            tracing::debug!(feature, "resolving property references");
        }
        let arguments = self.resolve_arguments(definition)?;

        let factory = self
            .factories
            .get(&definition.factory_ref)
            .ok_or_else(|| Error::FactoryNotFound {
                factory: definition.factory_ref.clone(),
                available: self.factories.names().into_iter().map(String::from).collect(),
            })?;

        tracing::info!(
            feature,
            factory = %definition.factory_ref,
            interface = %definition.interface_ref,
            "instantiating service"
        );
        factory(&arguments).map_err(Error::Construction)
    }
}

fn downcast<I>(instance: &Instance, requested: &str) -> Result<Arc<I>, Error>
where
    I: ?Sized + 'static,
{
    instance
        .downcast::<I>()
        .ok_or_else(|| Error::InvalidReturnType {
            requested: requested.to_string(),
            expected: type_name::<I>(),
            actual: instance.type_name(),
        })
}

/// Builder for constructing a [`ServiceLocator`].
///
/// Anything not supplied is discovered when [`build`](Self::build) is called:
/// the configuration via [`ConfigLoader::standard`], factories via
/// [`FactoryRegistry::discover`], and properties via [`PropertyResolver::standard`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ServiceLocatorBuilder {
    configuration: Option<Configuration>,
    factories: Option<FactoryRegistry>,
    properties: Option<PropertyResolver>,
}

impl ServiceLocatorBuilder {
    /// Uses `configuration` instead of discovering a config file.
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn with_factories(mut self, factories: FactoryRegistry) -> Self {
        self.factories = Some(factories);
        self
    }

    pub fn with_properties(mut self, properties: PropertyResolver) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Builds the `ServiceLocator`.
    ///
    /// Returns an error if a configuration had to be discovered and could not
    /// be loaded, or the standard property sources could not be read.
    pub fn build(self) -> Result<ServiceLocator, Error> {
        let configuration = match self.configuration {
            Some(configuration) => configuration,
            None => ConfigLoader::standard().load()?,
        };
        let factories = self.factories.unwrap_or_else(FactoryRegistry::discover);
        let properties = match self.properties {
            Some(properties) => properties,
            None => PropertyResolver::standard()?,
        };

        Ok(ServiceLocator {
            configuration,
            factories,
            properties,
            by_interface: Registry::new(),
            by_name: Registry::new(),
        })
    }
}
