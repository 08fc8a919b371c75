//! Integration tests for the session timer and its async driver.

use std::time::Duration;

use proptest::prelude::*;
use studyroom_core::timer::driver;
use studyroom_core::{
    CoreError, DriverConfig, Event, Phase, Priority, SessionTimer, SubjectId, SubjectRegistry,
    TopicRef, ValidationError,
};

fn algebra() -> TopicRef {
    TopicRef {
        id: SubjectId::new("alg"),
        name: "Algebra".into(),
        priority: Priority::Medium,
    }
}

fn running_focus() -> SessionTimer {
    let mut t = SessionTimer::new();
    t.select_topic(algebra()).unwrap();
    t.start().unwrap();
    t
}

fn running_break() -> SessionTimer {
    let mut t = running_focus();
    for _ in 0..1500 {
        t.tick();
    }
    t.start().unwrap();
    t
}

#[test]
fn full_focus_phase_becomes_break() {
    let mut t = running_focus();
    let before = t.completed_focus_sessions();
    let completions = (0..1500).filter_map(|_| t.tick()).count();

    assert_eq!(completions, 1);
    assert_eq!(t.phase(), Phase::Break);
    assert_eq!(t.remaining_secs(), 300);
    assert!(!t.is_running());
    assert_eq!(t.completed_focus_sessions(), before + 1);
}

#[test]
fn full_break_phase_becomes_focus() {
    let mut t = running_break();
    let before = t.completed_focus_sessions();
    let completions = (0..300).filter_map(|_| t.tick()).count();

    assert_eq!(completions, 1);
    assert_eq!(t.phase(), Phase::Focus);
    assert_eq!(t.remaining_secs(), 1500);
    assert!(!t.is_running());
    assert_eq!(t.completed_focus_sessions(), before);
}

#[test]
fn remaining_stays_within_phase_bounds() {
    let mut t = running_focus();
    for _ in 0..4000 {
        t.tick();
        assert!(t.remaining_secs() <= t.phase().duration_secs());
        if !t.is_running() {
            t.start().unwrap();
        }
    }
}

#[test]
fn timer_reads_priority_from_registry() {
    let reg = SubjectRegistry::seeded();
    let mut t = SessionTimer::new();
    t.select_topic_from(&reg, &SubjectId::new("1")).unwrap();
    t.start().unwrap();
    let ev = (0..1500).find_map(|_| t.tick()).unwrap();
    match ev {
        Event::PhaseCompleted { topic, priority, .. } => {
            assert_eq!(topic.as_deref(), Some("Mathematics"));
            assert_eq!(priority, Some(Priority::High));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

proptest! {
    #[test]
    fn start_pause_only_toggles_running(ops in prop::collection::vec(any::<bool>(), 0..40), with_topic in any::<bool>()) {
        let mut t = SessionTimer::new();
        if with_topic {
            t.select_topic(algebra()).unwrap();
        }
        for start in ops {
            if start {
                let _ = t.start();
                prop_assert_eq!(t.is_running(), with_topic);
            } else {
                t.pause();
                prop_assert!(!t.is_running());
            }
            prop_assert_eq!(t.phase(), Phase::Focus);
            prop_assert_eq!(t.remaining_secs(), 1500);
        }
    }

    #[test]
    fn reset_never_changes_phase_or_count(ticks in 0u32..2200, restart in any::<bool>()) {
        let mut t = running_focus();
        for _ in 0..ticks {
            t.tick();
        }
        if restart {
            let _ = t.start();
            t.tick();
        }
        let phase = t.phase();
        let sessions = t.completed_focus_sessions();

        t.reset();
        prop_assert_eq!(t.phase(), phase);
        prop_assert_eq!(t.completed_focus_sessions(), sessions);
        prop_assert_eq!(t.remaining_secs(), phase.duration_secs());
        prop_assert!(!t.is_running());
    }
}

// ── Driver ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn driver_completes_focus_and_stops() {
    let (handle, _task) = driver::spawn(SessionTimer::new(), DriverConfig::default());
    let mut events = handle.subscribe();
    handle.select_topic(algebra()).await.unwrap();
    handle.start().await.unwrap();

    let started = tokio::time::Instant::now();
    let completed = loop {
        match events.recv().await.unwrap() {
            ev @ Event::PhaseCompleted { .. } => break ev,
            _ => continue,
        }
    };
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1500) && elapsed < Duration::from_secs(1501));
    assert!(matches!(
        completed,
        Event::PhaseCompleted { completed: Phase::Focus, completed_focus_sessions: 1, .. }
    ));

    // The countdown waits at the boundary.
    tokio::time::sleep(Duration::from_secs(60)).await;
    let state = handle.state().await.unwrap();
    assert_eq!(state.phase(), Phase::Break);
    assert_eq!(state.remaining_secs(), 300);
    assert!(!state.is_running());
}

#[tokio::test(start_paused = true)]
async fn no_ticks_after_pause() {
    let (handle, _task) = driver::spawn(SessionTimer::new(), DriverConfig::default());
    handle.select_topic(algebra()).await.unwrap();
    handle.start().await.unwrap();

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    handle.pause().await.unwrap();
    tokio::time::sleep(Duration::from_secs(120)).await;

    let state = handle.state().await.unwrap();
    assert!(!state.is_running());
    assert_eq!(state.remaining_secs(), 1495);
}

#[tokio::test(start_paused = true)]
async fn no_stale_tick_after_reset() {
    let (handle, _task) = driver::spawn(SessionTimer::new(), DriverConfig::default());
    handle.select_topic(algebra()).await.unwrap();
    handle.start().await.unwrap();

    // Reset just before a tick is due.
    tokio::time::sleep(Duration::from_millis(3_999)).await;
    handle.reset().await.unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;

    let state = handle.state().await.unwrap();
    assert_eq!(state.remaining_secs(), 1500);
    assert!(!state.is_running());
}

#[tokio::test(start_paused = true)]
async fn restart_after_pause_resumes_countdown() {
    let (handle, _task) = driver::spawn(SessionTimer::new(), DriverConfig::default());
    handle.select_topic(algebra()).await.unwrap();
    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    handle.pause().await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    let state = handle.state().await.unwrap();
    assert_eq!(state.remaining_secs(), 1495);
}

#[tokio::test(start_paused = true)]
async fn driver_rejects_topic_during_break() {
    let mut timer = running_focus();
    for _ in 0..1500 {
        timer.tick();
    }
    let (handle, _task) = driver::spawn(timer, DriverConfig::default());

    let err = handle.select_topic(algebra()).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::TopicDuringBreak)
    ));
    // Break starts without a topic check.
    handle.start().await.unwrap();
    assert!(handle.state().await.unwrap().is_running());
}

#[tokio::test(start_paused = true)]
async fn fast_tick_period() {
    let config = DriverConfig {
        tick_period: Duration::from_millis(10),
    };
    let (handle, task) = driver::spawn(running_break(), config);
    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(3_005)).await;
    handle.shutdown().await.unwrap();

    let timer = task.await.unwrap();
    assert_eq!(timer.phase(), Phase::Focus);
    assert_eq!(timer.remaining_secs(), 1500);
}
