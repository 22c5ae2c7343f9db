//! Live and archived call records

use crate::state_machine::{CallState, Disposition};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// One caller's progress through the menus
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub caller: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub state: CallState,
}

impl Session {
    pub fn new(id: impl Into<String>, caller: impl Into<String>, root: &str) -> Self {
        Self {
            id: id.into(),
            caller: caller.into(),
            started_at: Utc::now(),
            ended_at: None,
            state: CallState::new(root),
        }
    }

    /// Ended sessions are frozen; a handle that still points at one is stale
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some() || self.state.is_ended()
    }

    /// Stamp `ended_at` and freeze the final field values. Returns `None`
    /// unless the call state has reached its terminal phase.
    pub fn close(&mut self, now: DateTime<Utc>) -> Option<ArchivedCall> {
        let disposition = self.state.disposition()?.clone();
        self.ended_at = Some(now);
        Some(ArchivedCall {
            id: self.id.clone(),
            caller: self.caller.clone(),
            started_at: self.started_at,
            ended_at: now,
            duration_secs: (now - self.started_at).num_seconds(),
            final_node: self.state.current_node.clone(),
            path: self.state.path.clone(),
            input_log: self.state.input_log.clone(),
            disposition,
        })
    }
}

/// Immutable record of a finished call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedCall {
    #[serde(rename = "call_id")]
    pub id: String,
    #[serde(rename = "caller_number")]
    pub caller: String,
    #[serde(rename = "start_time")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "end_time")]
    pub ended_at: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_secs: i64,
    pub final_node: String,
    #[serde(rename = "menu_path")]
    pub path: Vec<String>,
    #[serde(rename = "inputs")]
    pub input_log: Vec<String>,
    pub disposition: Disposition,
}

/// Shared handle to a live session.
///
/// Identity fields are copied out of the lock so the store can search by
/// caller without waiting on sessions that are mid-step.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: String,
    pub caller: String,
    pub started_at: DateTime<Utc>,
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            id: session.id.clone(),
            caller: session.caller.clone(),
            started_at: session.started_at,
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Serializes every mutation of this one session
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().await
    }
}
