use std::sync::Arc;

/// A possibly changing reference to a service instance.
///
/// Every successful `get` is paired with exactly one `unget`, even on error paths.
pub trait Import<T: ?Sized>: Send + Sync {
    /// The current instance, or `None` if the service is gone.
    fn get(&self) -> Option<Arc<T>>;

    fn unget(&self);
}

/// Holds an acquired instance and releases it on drop.
pub(crate) struct Lease<'a, T: ?Sized> {
    import: &'a dyn Import<T>,
}

impl<'a, T: ?Sized> Lease<'a, T> {
    /// Acquires the current instance. The import is released when the lease
    /// drops, whether or not an instance was available.
    pub(crate) fn acquire(import: &'a dyn Import<T>) -> (Self, Option<Arc<T>>) {
        let instance = import.get();
        (Self { import }, instance)
    }
}

impl<T: ?Sized> Drop for Lease<'_, T> {
    fn drop(&mut self) {
        self.import.unget();
    }
}
