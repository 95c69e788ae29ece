//! End-to-end switching scenarios driven through the public API.

use chrono::Duration;
use std::time::Duration as WallDuration;
use tokio::time::timeout;
use wallswitch::env::{ModuleDefinition, Signal, SwitchEvent, EMPTY_MODULE_NAME};
use wallswitch::testing::{Harness, LifecycleCall};
use wallswitch::{CompletionStatus, Phase, Timestamp};

fn ms(n: i64) -> Duration {
    Duration::milliseconds(n)
}

/// Harness already showing `home`, settled at the returned time.
fn showing_home(extra: Vec<ModuleDefinition>) -> (Harness, Timestamp) {
    let mut definitions = vec![ModuleDefinition::new("home")];
    definitions.extend(extra);
    let mut harness = Harness::new(definitions);
    let t0 = harness.start + ms(1000);

    let mut home = harness.switcher.request_switch("home", t0).unwrap();
    harness.switcher.advance_to(t0 + ms(5000));
    assert!(home.is_displayed());
    harness.log.clear();

    let now = harness.switcher.now();
    (harness, now)
}

#[test]
fn clock_loads_and_shows_instantly() {
    let mut harness = Harness::new(vec![ModuleDefinition::new("clock")]);
    let t0 = harness.start + ms(2000);

    let mut handle = harness.switcher.request_switch("clock", t0).unwrap();

    harness.switcher.advance_to(t0 - ms(1));
    assert_eq!(harness.switcher.phase(), Phase::Transitioning);
    assert!(harness.active.is_empty());

    harness.switcher.advance_to(t0);
    assert_eq!(harness.active.names(), vec!["clock".to_string()]);
    assert_eq!(handle.status(), CompletionStatus::Pending);

    harness.switcher.advance_to(t0 + ms(4999));
    assert_eq!(harness.switcher.phase(), Phase::Transitioning);

    harness.switcher.advance_to(t0 + ms(5000));
    assert_eq!(harness.switcher.phase(), Phase::Displaying);
    assert_eq!(harness.switcher.on_screen().name(), "clock");
    assert_eq!(harness.active.names(), vec!["clock".to_string()]);
    assert_eq!(handle.status(), CompletionStatus::Displayed);
}

#[test]
fn resolution_happens_exactly_once() {
    let mut harness = Harness::new(vec![ModuleDefinition::new("clock")]);
    let t0 = harness.start + ms(1000);

    let mut handle = harness.switcher.request_switch("clock", t0).unwrap();
    harness.switcher.advance_to(t0 + ms(5000));
    assert!(handle.is_displayed());

    harness.switcher.advance_to(t0 + ms(60_000));
    assert!(handle.is_displayed());
    assert_eq!(
        harness
            .switcher
            .history()
            .transitions()
            .filter(|t| t.to == Phase::Displaying)
            .count(),
        1
    );
}

#[test]
fn slow_module_times_out_and_still_resolves() {
    let never = Signal::pending();
    let mut harness = Harness::new(vec![ModuleDefinition::with_load_signal("slow", never)]);
    let t0 = harness.start + ms(1000);

    let mut handle = harness.switcher.request_switch("slow", t0).unwrap();
    harness.switcher.advance_to(t0 - ms(1));
    assert_eq!(harness.switcher.phase(), Phase::Preparing);

    harness.switcher.advance_to(t0);
    assert_eq!(harness.switcher.phase(), Phase::Transitioning);

    let timeouts = harness
        .monitor
        .events()
        .into_iter()
        .filter(|e| matches!(e, SwitchEvent::PreparationTimeout { .. }))
        .count();
    assert_eq!(timeouts, 1);

    harness.switcher.advance_to(t0 + ms(5000));
    assert_eq!(harness.switcher.phase(), Phase::Displaying);
    assert_eq!(handle.status(), CompletionStatus::Displayed);
    // Nothing loaded, so the wall shows a placeholder.
    assert_eq!(harness.active.names(), vec![EMPTY_MODULE_NAME.to_string()]);
}

#[test]
fn late_loading_module_is_shown_when_ready() {
    let loaded = Signal::pending();
    let mut harness = Harness::new(vec![ModuleDefinition::with_load_signal(
        "photos",
        loaded.clone(),
    )]);
    let t0 = harness.start + ms(3000);

    let mut handle = harness.switcher.request_switch("photos", t0).unwrap();
    harness.switcher.advance_to(t0 - ms(2000));
    assert!(harness.log.instantiated().is_empty());

    loaded.fire();
    harness.switcher.run_pending();
    assert_eq!(harness.log.instantiated(), vec!["photos".to_string()]);
    assert_eq!(harness.switcher.phase(), Phase::Transitioning);

    harness.switcher.advance_to(t0 + ms(5000));
    assert!(handle.is_displayed());
    assert_eq!(harness.active.names(), vec!["photos".to_string()]);
}

#[test]
fn second_request_wins_before_anything_loads() {
    let (mut harness, now) = showing_home(vec![
        ModuleDefinition::new("a"),
        ModuleDefinition::new("b"),
    ]);
    let t0 = now + ms(1000);

    let mut a = harness.switcher.request_switch("a", t0).unwrap();
    let mut b = harness.switcher.request_switch("b", t0 + ms(1)).unwrap();

    assert_eq!(harness.switcher.phase(), Phase::Preparing);
    assert_eq!(harness.switcher.on_screen().name(), "home");
    assert_eq!(a.status(), CompletionStatus::Pending);

    harness.switcher.advance_to(t0 + ms(6000));

    assert_eq!(harness.log.instantiated(), vec!["b".to_string()]);
    assert_eq!(harness.log.dispose_count("a"), 0);
    assert_eq!(harness.log.hidden_deadlines("home"), vec![t0 + ms(1)]);
    assert_eq!(a.status(), CompletionStatus::Pending);
    assert_eq!(b.status(), CompletionStatus::Displayed);
    assert_eq!(harness.active.names(), vec!["b".to_string()]);
}

#[test]
fn preempting_preparation_disposes_the_instance() {
    let (mut harness, now) = showing_home(vec![
        ModuleDefinition::new("a"),
        ModuleDefinition::new("b"),
    ]);
    let ta = now + ms(1000);
    let tb = now + ms(2000);
    harness.runtime.hold_show("a", Signal::pending());

    let mut a = harness.switcher.request_switch("a", ta).unwrap();
    harness.switcher.run_pending();
    assert_eq!(harness.switcher.in_flight().map(|m| m.name()), Some("a"));

    let mut b = harness.switcher.request_switch("b", tb).unwrap();
    assert_eq!(
        harness.log.calls_for("a"),
        vec![
            LifecycleCall::Instantiated {
                module: "a".to_string(),
                deadline: ta
            },
            LifecycleCall::ShownSoon {
                module: "a".to_string(),
                deadline: ta
            },
            LifecycleCall::HiddenSoon {
                module: "a".to_string(),
                deadline: tb
            },
            LifecycleCall::Disposed {
                module: "a".to_string()
            },
        ]
    );

    // Releasing the abandoned instance's show signal changes nothing.
    harness.runtime.release_show("a");
    harness.switcher.advance_to(tb + ms(5000));

    assert_eq!(a.status(), CompletionStatus::Pending);
    assert!(b.is_displayed());
    assert_eq!(harness.active.names(), vec!["b".to_string()]);
    assert_eq!(harness.switcher.on_screen().name(), "b");
}

#[test]
fn preempting_mid_transition_keeps_the_original_old_module() {
    let (mut harness, now) = showing_home(vec![
        ModuleDefinition::new("a"),
        ModuleDefinition::new("b"),
    ]);
    let ta = now + ms(1000);
    let tb = ta + ms(2000);

    let mut a = harness.switcher.request_switch("a", ta).unwrap();
    harness.switcher.advance_to(ta + ms(1000));
    assert_eq!(harness.switcher.phase(), Phase::Transitioning);
    assert_eq!(
        harness.active.names(),
        vec!["home".to_string(), "a".to_string()]
    );

    harness.runtime.hold_show("b", Signal::pending());
    let mut b = harness.switcher.request_switch("b", tb).unwrap();

    assert_eq!(harness.switcher.phase(), Phase::Preparing);
    assert_eq!(harness.switcher.on_screen().name(), "home");
    assert_eq!(harness.active.names(), vec!["home".to_string()]);
    assert_eq!(harness.log.hidden_deadlines("a"), vec![tb]);
    // The in-flight module is hidden and removed but not disposed.
    assert_eq!(harness.log.dispose_count("a"), 0);
    // The still-visible old module is not told about the new deadline at
    // preemption time; only b's own preparation tells it, once b loads.
    assert_eq!(harness.log.hidden_deadlines("home"), vec![ta]);

    harness.switcher.run_pending();
    assert_eq!(harness.log.hidden_deadlines("home"), vec![ta, tb]);

    harness.runtime.release_show("b");
    harness.switcher.advance_to(tb + ms(5000));
    assert_eq!(a.status(), CompletionStatus::Pending);
    assert!(b.is_displayed());
    assert_eq!(harness.active.names(), vec!["b".to_string()]);
}

#[test]
fn preempting_transition_before_reveal_is_safe() {
    let (mut harness, now) = showing_home(vec![
        ModuleDefinition::new("a"),
        ModuleDefinition::new("b"),
    ]);
    let ta = now + ms(1000);

    let _a = harness.switcher.request_switch("a", ta).unwrap();
    harness.switcher.run_pending();
    assert_eq!(harness.switcher.phase(), Phase::Transitioning);
    assert_eq!(harness.active.names(), vec!["home".to_string()]);

    let mut b = harness.switcher.request_switch("b", ta).unwrap();
    assert_eq!(harness.active.names(), vec!["home".to_string()]);

    harness.switcher.advance_to(ta + ms(5000));
    assert!(b.is_displayed());
    assert_eq!(harness.active.names(), vec!["b".to_string()]);
}

#[test]
fn displayed_module_becomes_the_next_old_module() {
    let (mut harness, now) = showing_home(vec![ModuleDefinition::new("clock")]);
    let t1 = now + ms(1000);
    harness.runtime.hold_show("clock", Signal::pending());

    let _clock = harness.switcher.request_switch("clock", t1).unwrap();
    assert_eq!(harness.switcher.phase(), Phase::Preparing);
    assert_eq!(harness.switcher.on_screen().name(), "home");

    harness.switcher.run_pending();
    assert_eq!(harness.log.hidden_deadlines("home"), vec![t1]);
}

#[test]
fn instances_receive_current_geometry() {
    let mut harness = Harness::new(vec![ModuleDefinition::new("clock")]);
    let t0 = harness.start + ms(1000);

    let _handle = harness.switcher.request_switch("clock", t0).unwrap();
    harness.switcher.run_pending();

    let geometries = harness.runtime.geometries();
    assert_eq!(geometries.len(), 1);
    assert_eq!(geometries[0].width, 1920);
    assert_eq!(geometries[0].height, 1080);
}

#[test]
fn past_deadline_switches_on_next_advance() {
    let (mut harness, now) = showing_home(vec![ModuleDefinition::new("clock")]);

    let mut handle = harness.switcher.request_switch("clock", now - ms(500)).unwrap();
    harness.switcher.advance_to(now);
    assert_eq!(harness.switcher.phase(), Phase::Transitioning);
    assert_eq!(
        harness.active.names(),
        vec!["home".to_string(), "clock".to_string()]
    );

    harness.switcher.advance_to(now + ms(4500));
    assert!(handle.is_displayed());
}

#[tokio::test]
async fn superseded_handle_never_completes() {
    let mut harness = Harness::new(vec![
        ModuleDefinition::new("a"),
        ModuleDefinition::new("b"),
    ]);
    let t0 = harness.start + ms(1000);

    let a = harness.switcher.request_switch("a", t0).unwrap();
    let b = harness.switcher.request_switch("b", t0).unwrap();
    harness.switcher.advance_to(t0 + ms(5000));

    timeout(WallDuration::from_millis(200), b)
        .await
        .expect("displayed request completes");
    assert!(timeout(WallDuration::from_millis(200), a).await.is_err());
}

#[tokio::test]
async fn superseded_handle_stays_silent_after_later_switches() {
    let (mut harness, now) = showing_home(vec![
        ModuleDefinition::new("a"),
        ModuleDefinition::new("b"),
    ]);
    let t0 = now + ms(1000);
    harness.runtime.hold_show("a", Signal::pending());

    let mut a = harness.switcher.request_switch("a", t0).unwrap();
    harness.switcher.run_pending();
    let mut b = harness.switcher.request_switch("b", t0).unwrap();
    harness.switcher.advance_to(t0 + ms(5000));
    assert!(b.is_displayed());

    // Switching back to a creates a new request; the old handle is unaffected.
    let mut again = harness.switcher.request_switch("a", t0 + ms(10_000)).unwrap();
    harness.runtime.release_show("a");
    harness.switcher.advance_to(t0 + ms(15_000));
    assert!(again.is_displayed());
    assert_eq!(a.status(), CompletionStatus::Pending);
    assert!(timeout(WallDuration::from_millis(50), a).await.is_err());
}
