//! Trait abstractions for runtime I/O
//!
//! These traits keep storage discipline and the reservation desk out of
//! the engine, and let tests swap in mock implementations.

use super::session::{ArchivedCall, SessionHandle};
use crate::state_machine::Reservation;
use async_trait::async_trait;
use std::sync::Arc;

/// Live sessions plus the append-only archive of finished ones
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new live session. Fails if the id is already taken,
    /// live or archived.
    async fn put(&self, handle: SessionHandle) -> Result<(), String>;

    /// Get a live session
    async fn get(&self, id: &str) -> Option<SessionHandle>;

    /// Drop a live session without archiving it
    #[allow(dead_code)] // API completeness
    async fn remove(&self, id: &str) -> Option<SessionHandle>;

    /// All live sessions
    async fn list(&self) -> Vec<SessionHandle>;

    /// Remove the live entry for `record.id` and append `record` to the
    /// archive as a single step
    async fn retire(&self, record: ArchivedCall);

    /// Archived calls, oldest first
    async fn history(&self) -> Vec<ArchivedCall>;

    /// `(active, archived)` counts taken at the same instant
    async fn counts(&self) -> (usize, usize);
}

/// Reservation desk consulted when a caller submits a complete code
#[async_trait]
pub trait ReservationLookup: Send + Sync {
    async fn lookup(&self, code: &str) -> Option<Reservation>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn put(&self, handle: SessionHandle) -> Result<(), String> {
        (**self).put(handle).await
    }

    async fn get(&self, id: &str) -> Option<SessionHandle> {
        (**self).get(id).await
    }

    async fn remove(&self, id: &str) -> Option<SessionHandle> {
        (**self).remove(id).await
    }

    async fn list(&self) -> Vec<SessionHandle> {
        (**self).list().await
    }

    async fn retire(&self, record: ArchivedCall) {
        (**self).retire(record).await;
    }

    async fn history(&self) -> Vec<ArchivedCall> {
        (**self).history().await
    }

    async fn counts(&self) -> (usize, usize) {
        (**self).counts().await
    }
}

#[async_trait]
impl<T: ReservationLookup + ?Sized> ReservationLookup for Arc<T> {
    async fn lookup(&self, code: &str) -> Option<Reservation> {
        (**self).lookup(code).await
    }
}
