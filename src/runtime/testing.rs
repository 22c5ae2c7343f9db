//! Mock implementations for testing
//!
//! These mocks let the engine run end to end without a real booking system.

use super::session::{ArchivedCall, SessionHandle};
use super::traits::*;
use super::InMemoryStorage;
use crate::state_machine::Reservation;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// Mock Reservation Desk
// ============================================================================

/// Desk with a fixed set of known codes that records every query
#[derive(Default)]
pub struct MockReservationDesk {
    known: HashMap<String, Reservation>,
    /// Record of all codes looked up
    pub queries: Mutex<Vec<String>>,
}

impl MockReservationDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reservation(mut self, code: &str, flight_id: &str, route: &str) -> Self {
        self.known.insert(
            code.to_string(),
            Reservation {
                pnr: code.to_string(),
                flight_id: flight_id.to_string(),
                status: "Confirmed".to_string(),
                route: route.to_string(),
            },
        );
        self
    }

    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReservationLookup for MockReservationDesk {
    async fn lookup(&self, code: &str) -> Option<Reservation> {
        self.queries.lock().unwrap().push(code.to_string());
        self.known.get(code).cloned()
    }
}

// ============================================================================
// Colliding Store
// ============================================================================

/// Store that rejects the first `collisions` inserts, as if the generated
/// ids were already taken
pub struct CollidingStorage {
    inner: InMemoryStorage,
    remaining: AtomicUsize,
    pub rejected: AtomicUsize,
}

impl CollidingStorage {
    pub fn new(collisions: usize) -> Self {
        Self {
            inner: InMemoryStorage::new(),
            remaining: AtomicUsize::new(collisions),
            rejected: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SessionStore for CollidingStorage {
    async fn put(&self, handle: SessionHandle) -> Result<(), String> {
        let left = self.remaining.load(Ordering::SeqCst);
        if left > 0 {
            self.remaining.store(left - 1, Ordering::SeqCst);
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(format!("Session id already issued: {}", handle.id));
        }
        self.inner.put(handle).await
    }

    async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.inner.get(id).await
    }

    async fn remove(&self, id: &str) -> Option<SessionHandle> {
        self.inner.remove(id).await
    }

    async fn list(&self) -> Vec<SessionHandle> {
        self.inner.list().await
    }

    async fn retire(&self, record: ArchivedCall) {
        self.inner.retire(record).await;
    }

    async fn history(&self) -> Vec<ArchivedCall> {
        self.inner.history().await
    }

    async fn counts(&self) -> (usize, usize) {
        self.inner.counts().await
    }
}

// ============================================================================
// Engine Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{airline, DtmfSymbol};
    use crate::runtime::{EndCallStatus, EngineError, SessionEngine, StaticReservationDesk};
    use crate::state_machine::{CallDirective, Disposition, Outcome};
    use std::sync::Arc;

    type TestEngine = SessionEngine<Arc<InMemoryStorage>, Arc<MockReservationDesk>>;

    fn engine_with(
        desk: MockReservationDesk,
    ) -> (TestEngine, Arc<InMemoryStorage>, Arc<MockReservationDesk>) {
        let store = Arc::new(InMemoryStorage::new());
        let desk = Arc::new(desk);
        let engine = SessionEngine::new(
            Arc::new(airline::menu().unwrap()),
            store.clone(),
            desk.clone(),
        );
        (engine, store, desk)
    }

    fn engine() -> TestEngine {
        let desk = MockReservationDesk::new().with_reservation("123456", "HS123", "Pune → Mumbai");
        engine_with(desk).0
    }

    async fn at_flight_status(engine: &TestEngine) -> String {
        let call = engine.start_call("+1555000").await;
        let outcome = engine.apply_input(&call.session_id, "2").await.unwrap();
        assert!(matches!(outcome, Outcome::Processed { .. }));
        call.session_id
    }

    #[tokio::test]
    async fn test_start_call_returns_root_prompt() {
        let engine = engine();
        let call = engine.start_call("+1555000").await;

        assert_eq!(call.prompt, airline::MAIN_PROMPT);
        assert!(call.session_id.starts_with("CALL_"));

        let session = engine.session(&call.session_id).await.unwrap();
        assert_eq!(session.caller, "+1555000");
        assert_eq!(session.state.current_node, "main");
        assert_eq!(session.state.path, ["main"]);
        assert!(session.ended_at.is_none());
        assert_eq!(engine.snapshot().await.active_count, 1);
    }

    #[tokio::test]
    async fn test_start_call_ids_are_unique() {
        let engine = engine();
        let a = engine.start_call("+1555000").await;
        let b = engine.start_call("+1555000").await;
        assert_ne!(a.session_id, b.session_id);
    }

    #[tokio::test]
    async fn test_start_call_retries_on_collision() {
        let store = Arc::new(CollidingStorage::new(2));
        let engine = SessionEngine::new(
            Arc::new(airline::menu().unwrap()),
            store.clone(),
            StaticReservationDesk::default(),
        );

        let call = engine.start_call("+1555000").await;

        assert_eq!(store.rejected.load(Ordering::SeqCst), 2);
        assert!(engine.session(&call.session_id).await.is_some());
    }

    #[tokio::test]
    async fn test_navigate_to_submenu() {
        let engine = engine();
        let call = engine.start_call("+1555000").await;

        let outcome = engine.apply_input(&call.session_id, "1").await.unwrap();
        let menu = airline::menu().unwrap();
        let booking_prompt = &menu.node_by_id("booking").unwrap().prompt;
        match outcome {
            Outcome::Processed { prompt, node, message } => {
                assert_eq!(node, "booking");
                assert_eq!(&prompt, booking_prompt);
                assert_eq!(message, "Booking selected. Redirecting to booking options.");
            }
            other => panic!("Expected Processed, got {other:?}"),
        }

        let session = engine.session(&call.session_id).await.unwrap();
        assert_eq!(session.state.current_node, "booking");
        assert_eq!(session.state.path, ["main", "booking"]);
        assert_eq!(session.state.input_log, ["1"]);
    }

    #[tokio::test]
    async fn test_full_code_is_looked_up_and_archived() {
        let desk = MockReservationDesk::new().with_reservation("123456", "HS123", "Pune → Mumbai");
        let (engine, _, desk) = engine_with(desk);
        let id = at_flight_status(&engine).await;

        let mut seen = String::new();
        for digit in ["1", "2", "3", "4", "5"] {
            seen.push_str(digit);
            let outcome = engine.apply_input(&id, digit).await.unwrap();
            assert_eq!(
                outcome,
                Outcome::Collecting {
                    prompt: format!("You entered {digit}. Enter remaining digits."),
                    collected: seen.clone(),
                }
            );
        }

        match engine.apply_input(&id, "6").await.unwrap() {
            Outcome::Collecting { prompt, collected } => {
                assert_eq!(collected, "123456");
                assert!(prompt.contains('#'));
            }
            other => panic!("Expected Collecting, got {other:?}"),
        }

        let outcome = engine.apply_input(&id, "#").await.unwrap();
        match &outcome {
            Outcome::Found { message, reservation } => {
                assert!(message.contains("123456"));
                assert_eq!(reservation.flight_id, "HS123");
            }
            other => panic!("Expected Found, got {other:?}"),
        }
        assert_eq!(outcome.directive(), Some(CallDirective::Hangup));
        assert_eq!(desk.recorded_queries(), ["123456"]);

        assert!(engine.session(&id).await.is_none());
        let history = engine.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, id);
        assert_eq!(
            history[0].disposition,
            Disposition::ReservationFound {
                pnr: "123456".to_string()
            }
        );
        assert_eq!(history[0].input_log, ["2", "1", "2", "3", "4", "5", "6", "#"]);
        assert_eq!(history[0].final_node, "flight_status");
    }

    #[tokio::test]
    async fn test_short_code_hangs_up_without_lookup() {
        let (engine, store, desk) = engine_with(MockReservationDesk::new());
        let id = at_flight_status(&engine).await;
        engine.apply_input(&id, "1").await.unwrap();
        engine.apply_input(&id, "2").await.unwrap();

        let outcome = engine.apply_input(&id, "#").await.unwrap();

        assert!(matches!(outcome, Outcome::InvalidLookup { .. }));
        assert_eq!(outcome.directive(), Some(CallDirective::Hangup));
        assert!(desk.recorded_queries().is_empty());
        assert!(store.get(&id).await.is_none());

        let history = engine.history().await;
        assert_eq!(history[0].disposition, Disposition::LookupFailed);
    }

    #[tokio::test]
    async fn test_unknown_code_is_invalid_lookup() {
        let (engine, _, desk) = engine_with(MockReservationDesk::new());
        let id = at_flight_status(&engine).await;
        for digit in ["9", "9", "9", "9", "9", "9"] {
            engine.apply_input(&id, digit).await.unwrap();
        }

        let outcome = engine.apply_input(&id, "#").await.unwrap();

        match outcome {
            Outcome::InvalidLookup { message } => assert!(message.contains("999999")),
            other => panic!("Expected InvalidLookup, got {other:?}"),
        }
        assert_eq!(desk.recorded_queries(), ["999999"]);
        assert_eq!(engine.history().await[0].disposition, Disposition::LookupFailed);
    }

    #[tokio::test]
    async fn test_unassigned_digit_is_rejected() {
        let engine = engine();
        let call = engine.start_call("+1555000").await;

        let outcome = engine.apply_input(&call.session_id, "0").await.unwrap();

        let expected: Vec<DtmfSymbol> = (1..=9).map(DtmfSymbol::digit).collect();
        match outcome {
            Outcome::InvalidInput { valid_symbols, .. } => {
                assert_eq!(valid_symbols, Some(expected));
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        let session = engine.session(&call.session_id).await.unwrap();
        assert_eq!(session.state.current_node, "main");
        assert_eq!(session.state.input_log, ["0"]);
    }

    #[tokio::test]
    async fn test_unknown_session_not_found() {
        let engine = engine();
        let err = engine.apply_input("nonexistent-id", "1").await.unwrap_err();
        assert!(matches!(err, EngineError::SessionNotFound(id) if id == "nonexistent-id"));
    }

    #[tokio::test]
    async fn test_transfer_archives_with_directive() {
        let engine = engine();
        let call = engine.start_call("+1555000").await;

        let outcome = engine.apply_input(&call.session_id, "9").await.unwrap();

        assert!(matches!(outcome, Outcome::Transferring { .. }));
        assert_eq!(outcome.directive(), Some(CallDirective::Transfer));
        assert_eq!(engine.history().await[0].disposition, Disposition::Transferred);
    }

    #[tokio::test]
    async fn test_archived_session_rejects_input() {
        let engine = engine();
        let call = engine.start_call("+1555000").await;
        engine.apply_input(&call.session_id, "1").await.unwrap();
        engine.apply_input(&call.session_id, "1").await.unwrap();

        let before = engine.history().await;
        let err = engine.apply_input(&call.session_id, "0").await.unwrap_err();

        assert!(matches!(err, EngineError::SessionNotFound(_)));
        assert_eq!(engine.history().await, before);
    }

    #[tokio::test]
    async fn test_end_call_is_idempotent() {
        let engine = engine();
        let call = engine.start_call("+1555000").await;
        engine.apply_input(&call.session_id, "3").await.unwrap();

        assert_eq!(engine.end_call(&call.session_id).await.unwrap(), EndCallStatus::Ended);
        assert_eq!(engine.end_call(&call.session_id).await.unwrap(), EndCallStatus::NotFound);
        assert_eq!(engine.end_call("never-issued").await.unwrap(), EndCallStatus::NotFound);

        let history = engine.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].disposition, Disposition::CallerHangup);
        assert_eq!(history[0].final_node, "baggage");
        assert_eq!(history[0].path, ["main", "baggage"]);
    }

    #[tokio::test]
    async fn test_snapshot_counts() {
        let engine = engine();
        let a = engine.start_call("+1555000").await;
        engine.start_call("+1555001").await;
        engine.end_call(&a.session_id).await.unwrap();

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.active_count, 1);
        assert_eq!(snapshot.archived_count, 1);
    }

    #[tokio::test]
    async fn test_find_by_caller_prefers_newest() {
        let engine = engine();
        let first = engine.start_call("+1555000").await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = engine.start_call("+1555000").await;
        engine.start_call("+1555999").await;

        assert_eq!(
            engine.find_by_caller("+1555000").await,
            Some(second.session_id.clone())
        );

        engine.end_call(&second.session_id).await.unwrap();
        assert_eq!(engine.find_by_caller("+1555000").await, Some(first.session_id));
        assert_eq!(engine.find_by_caller("+1000000").await, None);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let engine = engine();
        let a = engine.start_call("+1555000").await;
        let b = engine.start_call("+1555001").await;

        engine.apply_input(&a.session_id, "1").await.unwrap();
        engine.apply_input(&b.session_id, "5").await.unwrap();

        assert_eq!(
            engine.session(&a.session_id).await.unwrap().state.current_node,
            "booking"
        );
        assert_eq!(
            engine.session(&b.session_id).await.unwrap().state.current_node,
            "seat"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inputs_on_one_session_are_serialized() {
        let engine = Arc::new(engine());
        let id = at_flight_status(&engine).await;

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let engine = engine.clone();
                let id = id.clone();
                tokio::spawn(async move { engine.apply_input(&id, "7").await })
            })
            .collect();
        for task in tasks {
            let outcome = task.await.unwrap().unwrap();
            assert!(matches!(outcome, Outcome::Collecting { .. }));
        }

        let session = engine.session(&id).await.unwrap();
        assert_eq!(session.state.buffer, "777777");
        assert_eq!(session.state.input_log.len(), 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_hangups_archive_once() {
        let engine = Arc::new(engine());
        let call = engine.start_call("+1555000").await;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                let id = call.session_id.clone();
                tokio::spawn(async move { engine.end_call(&id).await })
            })
            .collect();

        let mut ended = 0;
        for task in tasks {
            if task.await.unwrap().unwrap() == EndCallStatus::Ended {
                ended += 1;
            }
        }

        assert_eq!(ended, 1);
        assert_eq!(engine.history().await.len(), 1);
        assert_eq!(engine.snapshot().await.active_count, 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_keypad() -> impl Strategy<Value = String> {
            prop_oneof![
                9 => "[0-9#*]",
                1 => "[a-z]{1,2}",
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            // A call is live or archived, never both, and archiving happens once
            #[test]
            fn prop_session_is_live_xor_archived(
                inputs in proptest::collection::vec(arb_keypad(), 0..25),
                hang_up in any::<bool>(),
            ) {
                let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                rt.block_on(async {
                    let (engine, store, _) = engine_with(MockReservationDesk::new());
                    let call = engine.start_call("+1555000").await;
                    let mut archived = false;

                    for raw in &inputs {
                        match engine.apply_input(&call.session_id, raw).await {
                            Ok(outcome) => archived = outcome.is_terminal(),
                            Err(EngineError::SessionNotFound(_)) => assert!(archived),
                            Err(e) => panic!("unexpected engine error: {e}"),
                        }
                        let live = store.get(&call.session_id).await.is_some();
                        let snapshot = engine.snapshot().await;
                        assert_eq!(live, !archived);
                        assert_eq!(snapshot.active_count + snapshot.archived_count, 1);
                    }

                    if hang_up {
                        let status = engine.end_call(&call.session_id).await.unwrap();
                        assert_eq!(status == EndCallStatus::Ended, !archived);
                        archived = true;
                    }

                    let history = engine.history().await;
                    assert_eq!(history.len(), usize::from(archived));
                    if let Some(record) = history.first() {
                        assert_eq!(record.path.first().map(String::as_str), Some("main"));
                        assert!(record.input_log.len() <= inputs.len());
                    }
                });
            }
        }
    }
}
