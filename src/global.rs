//! Process-wide service locator.
//!
//! For applications that do not pass a [`ServiceLocator`] around. The locator
//! is built from the discovered configuration on first use, or installed
//! explicitly beforehand with [`configure`] or [`install`].
//!
//! Configure before the first lookup. Configuring again replaces the locator
//! together with its cached instances; instances already handed out stay
//! alive but are not returned again.

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::Configuration;
use crate::locator::ServiceLocator;
use crate::{Error, Interface};

static LOCATOR: RwLock<Option<Arc<ServiceLocator>>> = RwLock::new(None);

/// Installs a locator for `configuration`, using discovered factories and the
/// standard property sources.
pub fn configure(configuration: Configuration) -> Result<Arc<ServiceLocator>, Error> {
    let locator = ServiceLocator::builder()
        .with_configuration(configuration)
        .build()?;
    Ok(install(locator))
}

/// Installs `locator`, replacing any previous one.
pub fn install(locator: ServiceLocator) -> Arc<ServiceLocator> {
    let locator = Arc::new(locator);
    let mut slot = LOCATOR.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        tracing::warn!("service locator already configured, reconfiguring");
    }
    *slot = Some(Arc::clone(&locator));
    locator
}

/// The installed locator, building one from discovery if none is installed yet.
pub fn locator() -> Result<Arc<ServiceLocator>, Error> {
    if let Some(locator) = LOCATOR
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Ok(Arc::clone(locator));
    }

    let mut slot = LOCATOR.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(locator) = slot.as_ref() {
        return Ok(Arc::clone(locator));
    }
    tracing::info!("creating service locator from discovered configuration");
    let locator = Arc::new(ServiceLocator::builder().build()?);
    *slot = Some(Arc::clone(&locator));
    Ok(locator)
}

/// Looks up `I` on the process-wide locator.
pub fn service<I>() -> Result<Arc<I>, Error>
where
    I: ?Sized + Interface,
{
    locator()?.service::<I>()
}

/// Looks up a named feature on the process-wide locator.
pub fn service_by_name<I>(feature: &str) -> Result<Arc<I>, Error>
where
    I: ?Sized + 'static,
{
    locator()?.service_by_name::<I>(feature)
}

/// Removes the installed locator. The next lookup discovers a new one.
pub fn reset() {
    LOCATOR
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}

/// Whether a locator is currently installed.
pub fn is_configured() -> bool {
    LOCATOR
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}
