//! Optional, memoized collaborator slots held by a generator.

use once_cell::sync::OnceCell;
use std::sync::Arc;

type Factory<T> = Box<dyn Fn() -> Arc<T> + Send + Sync>;

/// One collaborator slot: absent, already built, or built on first use.
///
/// A lazy slot runs its factory at most once per slot, even when the owning
/// generator is shared between threads.
pub(crate) struct Collaborator<T: ?Sized> {
    instance: OnceCell<Arc<T>>,
    factory: Option<Factory<T>>,
}

impl<T: ?Sized> Collaborator<T> {
    /// No collaborator: the layer it serves is skipped.
    pub(crate) fn absent() -> Self {
        Self {
            instance: OnceCell::new(),
            factory: None,
        }
    }

    pub(crate) fn ready(instance: Arc<T>) -> Self {
        Self {
            instance: OnceCell::from(instance),
            factory: None,
        }
    }

    pub(crate) fn lazy(factory: Factory<T>) -> Self {
        Self {
            instance: OnceCell::new(),
            factory: Some(factory),
        }
    }

    pub(crate) fn get(&self) -> Option<&T> {
        if let Some(instance) = self.instance.get() {
            return Some(instance.as_ref());
        }
        let factory = self.factory.as_ref()?;
        Some(self.instance.get_or_init(|| factory()).as_ref())
    }

    pub(crate) fn is_configured(&self) -> bool {
        self.instance.get().is_some() || self.factory.is_some()
    }
}
