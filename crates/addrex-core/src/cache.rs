//! Process-wide annotator cache.
//!
//! Annotators are expensive to build (model loading) and cheap to call, so
//! the service builds one at most once and shares it. Concurrent first
//! callers wait on a single construction; once it has completed, lookups
//! only clone an `Arc`. [`AnnotatorCache::reset`] and
//! [`AnnotatorCache::inject`] exist so tests can swap in a fake backend.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::OnceCell;
use tracing::info;

use crate::error::AddrexResult;
use crate::traits::Annotator;

type Slot = Arc<OnceCell<Arc<dyn Annotator>>>;

/// Lazily initialized, shared annotator.
pub struct AnnotatorCache {
    // The lock only guards swapping the slot on reset/inject.
    slot: RwLock<Slot>,
}

impl AnnotatorCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Arc::new(OnceCell::new())),
        }
    }

    /// Create a cache that already holds an annotator.
    pub fn with_annotator(annotator: Arc<dyn Annotator>) -> Self {
        Self {
            slot: RwLock::new(Arc::new(OnceCell::new_with(Some(annotator)))),
        }
    }

    fn current(&self) -> Slot {
        Arc::clone(&self.slot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Return the cached annotator, constructing it with `init` if needed.
    ///
    /// If `init` fails the error is returned and the cache stays empty.
    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> AddrexResult<Arc<dyn Annotator>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AddrexResult<Arc<dyn Annotator>>>,
    {
        let slot = self.current();
        let annotator = slot
            .get_or_try_init(|| async {
                let annotator = init().await?;
                info!(model = annotator.model_name(), "Annotator loaded");
                Ok::<_, crate::error::AddrexError>(annotator)
            })
            .await?;
        Ok(Arc::clone(annotator))
    }

    /// Return the cached annotator without constructing one.
    pub fn get(&self) -> Option<Arc<dyn Annotator>> {
        self.current().get().cloned()
    }

    /// Check if an annotator has been constructed.
    pub fn is_loaded(&self) -> bool {
        self.current().initialized()
    }

    /// Replace the cached annotator.
    pub fn inject(&self, annotator: Arc<dyn Annotator>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) =
            Arc::new(OnceCell::new_with(Some(annotator)));
    }

    /// Drop the cached annotator; the next lookup constructs a new one.
    pub fn reset(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(OnceCell::new());
    }
}

impl Default for AnnotatorCache {
    fn default() -> Self {
        Self::new()
    }
}
