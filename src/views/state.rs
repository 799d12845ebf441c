use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// State owned by one mounted view.
///
/// Clones share the same state. Once [`ViewState::unmount`] is called every
/// later [`ViewState::update`] is dropped, so a response that lands after
/// the view went away cannot change what it held.
#[derive(Debug)]
pub struct ViewState<S> {
    inner: Arc<Mutex<S>>,
    mounted: Arc<AtomicBool>,
}

impl<S> Clone for ViewState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            mounted: Arc::clone(&self.mounted),
        }
    }
}

impl<S> ViewState<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Applies `f` if the view is still mounted. Returns `None` otherwise.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let mut guard = self.lock();
        if !self.is_mounted() {
            tracing::debug!("view unmounted, discarding state update");
            return None;
        }
        Some(f(&mut guard))
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
