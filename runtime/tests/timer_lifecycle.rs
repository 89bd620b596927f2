//! Integration tests for interval effects owned by the Store
//!
//! Covers replacement of a running interval by a new one under the same id,
//! independent observers of tick actions, and interval cleanup on cancel.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use eventdesk_core::{effect::Effect, effect::TimerId, every, reducer::Reducer, smallvec, SmallVec};
use eventdesk_runtime::Store;
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Start (or restart) the clock with the given period in ms
    StartClock { period_ms: u64 },
    /// One clock tick
    Tick,
    /// Stop the clock
    StopClock,
}

#[derive(Debug, Clone, Default)]
struct TestState {
    ticks: u32,
}

struct TestEnvironment;

struct ClockReducer;

fn clock_id() -> TimerId {
    TimerId::new("clock")
}

impl Reducer for ClockReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::StartClock { period_ms } => smallvec![every! {
                id: clock_id(),
                period: Duration::from_millis(period_ms),
                action: TestAction::Tick
            }],
            TestAction::Tick => {
                state.ticks += 1;
                SmallVec::new()
            },
            TestAction::StopClock => smallvec![Effect::Cancel(clock_id())],
        }
    }
}

fn clock_store() -> Store<TestState, TestAction, TestEnvironment, ClockReducer> {
    Store::new(TestState::default(), ClockReducer, TestEnvironment)
}

// ============================================================================
// Tests
// ============================================================================

/// Restarting under the same id replaces the running interval
#[tokio::test(start_paused = true)]
async fn test_restart_replaces_interval() {
    let store = clock_store();

    store.send(TestAction::StartClock { period_ms: 100 }).await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(store.state(|s| s.ticks).await, 2);

    // Slower clock: the 100 ms task is aborted
    store.send(TestAction::StartClock { period_ms: 1_000 }).await.unwrap();
    assert_eq!(store.active_timers(), 1);

    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(store.state(|s| s.ticks).await, 2);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(store.state(|s| s.ticks).await, 3);

    store.send(TestAction::StopClock).await.unwrap();
    assert_eq!(store.active_timers(), 0);
}

/// Every subscriber sees every tick
#[tokio::test(start_paused = true)]
async fn test_concurrent_observers_see_ticks() {
    let store = clock_store();
    let mut first = store.subscribe_actions();
    let mut second = store.subscribe_actions();

    store.send(TestAction::StartClock { period_ms: 50 }).await.unwrap();
    tokio::time::sleep(Duration::from_millis(160)).await;
    store.send(TestAction::StopClock).await.unwrap();

    for receiver in [&mut first, &mut second] {
        let mut ticks = 0;
        while let Ok(action) = receiver.try_recv() {
            assert_eq!(action, TestAction::Tick);
            ticks += 1;
        }
        assert_eq!(ticks, 3);
    }
}

/// Cancelling an unknown id is harmless
#[tokio::test(start_paused = true)]
async fn test_stop_without_start_is_noop() {
    let store = clock_store();

    store.send(TestAction::StopClock).await.unwrap();
    assert_eq!(store.active_timers(), 0);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(store.state(|s| s.ticks).await, 0);
    store.shutdown(Duration::from_millis(100)).await.unwrap();
}
