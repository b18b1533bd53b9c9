use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// An abstraction that implementations can be located for.
///
/// Implemented for the trait object type of each service trait, naming the
/// identifier used in the `implements` field of factory definitions:
///
/// ```
/// use di_locator::Interface;
///
/// pub trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// impl Interface for dyn Clock {
///     const NAME: &'static str = "time.Clock";
/// }
/// ```
pub trait Interface: Send + Sync + 'static {
    const NAME: &'static str;
}

/// A type-erased, shareable service instance.
///
/// Wraps an `Arc<I>` for the abstraction `I` it was built for. Clones share the
/// same underlying instance.
#[derive(Clone)]
pub struct Instance {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// Wraps an instance of abstraction `I`.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use di_locator::{Instance, Interface};
    /// # pub trait Clock: Send + Sync { fn now(&self) -> u64; }
    /// # impl Interface for dyn Clock { const NAME: &'static str = "time.Clock"; }
    /// struct FixedClock(u64);
    ///
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> u64 {
    ///         self.0
    ///     }
    /// }
    ///
    /// let instance = Instance::new::<dyn Clock>(Arc::new(FixedClock(7)));
    /// assert_eq!(instance.downcast::<dyn Clock>().unwrap().now(), 7);
    /// ```
    pub fn new<I>(value: Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<I>(),
        }
    }

    /// Returns the instance as `Arc<I>` if it was built for `I`.
    pub fn downcast<I>(&self) -> Option<Arc<I>>
    where
        I: ?Sized + 'static,
    {
        self.inner.downcast_ref::<Arc<I>>().cloned()
    }

    /// Name of the abstraction type this instance was built for.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
