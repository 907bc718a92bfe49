use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Predicate selecting which services or methods get intercepted.
pub trait Matcher<T: ?Sized>: Send + Sync {
    fn matches(&self, item: &T) -> bool;
}

impl<T: ?Sized, F> Matcher<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn matches(&self, item: &T) -> bool {
        self(item)
    }
}

/// Matches everything.
pub struct MatchAll<T: ?Sized>(PhantomData<fn(&T)>);

impl<T: ?Sized> Matcher<T> for MatchAll<T> {
    fn matches(&self, _item: &T) -> bool {
        true
    }
}

impl<T: ?Sized> fmt::Debug for MatchAll<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MatchAll")
    }
}

pub fn any<T: ?Sized + 'static>() -> Arc<dyn Matcher<T>> {
    Arc::new(MatchAll(PhantomData))
}
