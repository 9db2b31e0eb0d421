use std::{fmt, sync::Arc};

use parking_lot::RwLock;

/// A value given either directly or as a function producing it.
///
/// Lazy thunks let mutually referencing types be declared before all of them
/// exist. A lazy thunk is invoked at most once per cache generation.
pub enum Thunk<T> {
    /// The value itself.
    Ready(T),
    /// A function producing the value on first use.
    Lazy(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Thunk<T> {
    /// Wraps a function into a lazy thunk.
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::Lazy(Arc::new(f))
    }

    fn resolve(&self) -> T {
        match self {
            Self::Ready(v) => v.clone(),
            Self::Lazy(f) => f(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Thunk<T> {
    /// Applies `f` to the value, deferring it to resolution time for lazy
    /// thunks.
    pub(crate) fn amend<F>(&mut self, f: F)
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        match self {
            Self::Ready(v) => f(v),
            Self::Lazy(inner) => {
                let inner = inner.clone();
                *self = Self::Lazy(Arc::new(move || {
                    let mut v = inner();
                    f(&mut v);
                    v
                }));
            }
        }
    }
}

impl<T: Default> Default for Thunk<T> {
    fn default() -> Self {
        Self::Ready(T::default())
    }
}

impl<T> From<T> for Thunk<T> {
    fn from(v: T) -> Self {
        Self::Ready(v)
    }
}

impl<T: fmt::Debug> fmt::Debug for Thunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(v) => f.debug_tuple("Ready").field(v).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Thunk plus its resolved value, guarded by a read/write lock.
///
/// Readers receive an `Arc` snapshot, so a concurrent [`ThunkCell::amend`]
/// never exposes a partially updated value.
pub(crate) struct ThunkCell<T> {
    state: RwLock<CellState<T>>,
}

struct CellState<T> {
    thunk: Thunk<T>,
    resolved: Option<Arc<T>>,
}

impl<T: Clone + Send + Sync + 'static> ThunkCell<T> {
    pub(crate) fn new(thunk: Thunk<T>) -> Self {
        Self {
            state: RwLock::new(CellState {
                thunk,
                resolved: None,
            }),
        }
    }

    /// Returns the resolved value, running the thunk on first access.
    ///
    /// The thunk runs under the write lock and must not read the cell it
    /// belongs to.
    pub(crate) fn get(&self) -> Arc<T> {
        if let Some(v) = &self.state.read().resolved {
            return v.clone();
        }

        let mut state = self.state.write();
        if let Some(v) = &state.resolved {
            return v.clone();
        }
        let v = Arc::new(state.thunk.resolve());
        state.resolved = Some(v.clone());
        v
    }

    /// Changes the source thunk and invalidates the cached value.
    pub(crate) fn amend<F>(&self, f: F)
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let mut state = self.state.write();
        state.thunk.amend(f);
        state.resolved = None;
    }
}
