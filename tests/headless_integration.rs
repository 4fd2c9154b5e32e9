use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ondot::clock::ManualClock;
use ondot::config::Config;
use ondot::grade::Grade;
use ondot::presenter::{ReadoutPhase, RecordingPresenter};
use ondot::runtime::{FixedTicker, GameEvent, Runner, TestEventSource};
use ondot::Challenge;

fn press(c: char) -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn headless(target: f64) -> (ManualClock, Challenge<ManualClock, RecordingPresenter>) {
    let clock = ManualClock::new();
    let config = Config {
        seed: Some(1),
        ..Config::default()
    };
    let challenge = Challenge::with_target(clock.clone(), RecordingPresenter::new(), config, target);
    (clock, challenge)
}

// Headless run through Runner/TestEventSource: every Tick advances the
// manual clock by one frame, keys are mapped the way the binary maps them.
#[test]
fn headless_start_stop_flow_grades_attempt() {
    let (clock, mut challenge) = headless(3.0);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    tx.send(press(' ')).unwrap();

    let mut frames = 0u32;
    for _ in 0..400u32 {
        match runner.step() {
            GameEvent::Tick => {
                clock.advance(Duration::from_millis(10));
                if challenge.on_tick() {
                    frames += 1;
                }
                // 3.02s in: stop the clock
                if challenge.is_running() && challenge.elapsed_secs() >= 3.02 - 1e-9 {
                    tx.send(press(' ')).unwrap();
                }
            }
            GameEvent::Key(key) => {
                if key.code == KeyCode::Char(' ') && challenge.start_or_stop().is_some() {
                    break;
                }
            }
            GameEvent::Resize(..) => {}
            GameEvent::Closed => break,
        }
    }

    assert!(!challenge.is_running(), "run should have been stopped");
    assert!(frames > 0, "live readout should have refreshed");
    let attempt = challenge.history().latest().copied().expect("one attempt recorded");
    assert_eq!(attempt.grade, Grade::S);
    assert!((attempt.elapsed_secs - 3.02).abs() < 1e-6);
    assert_eq!(challenge.readout().phase, ReadoutPhase::Stopped);
}

#[test]
fn headless_reference_scenario() {
    let (clock, mut challenge) = headless(3.0);
    let mut grades = Vec::new();
    for elapsed in [3.02, 3.10, 3.20, 4.00] {
        challenge.start_or_stop();
        clock.advance_secs(elapsed);
        challenge.on_tick();
        grades.push(challenge.start_or_stop().map(|a| a.grade));
    }
    assert_eq!(
        grades,
        vec![Some(Grade::S), Some(Grade::A), Some(Grade::B), Some(Grade::C)]
    );

    let rows = challenge.presenter().last_stats().unwrap();
    assert_eq!(rows[1].value, "4");
    assert_eq!(rows[2].value, "0.020s");
    assert_eq!(rows[3].value, "C (1.000s)");

    let history = challenge.presenter().last_history().unwrap();
    assert_eq!(history.len(), 4);
    assert!(history[0].label.starts_with("#4"));
    assert!(history[3].label.starts_with("#1"));
}

#[test]
fn headless_target_change_mid_run_leaves_ledger_alone() {
    let (clock, mut challenge) = headless(3.0);
    challenge.start_or_stop();
    clock.advance_secs(3.0);
    challenge.start_or_stop();

    let stats_before = challenge.presenter().last_stats().unwrap()[1..].to_vec();
    let history_calls = challenge.presenter().histories.len();

    challenge.start_or_stop();
    clock.advance_secs(1.2);
    challenge.on_tick();
    challenge.new_random_target();

    assert!(!challenge.is_running());
    assert_eq!(challenge.history().len(), 1);
    assert_eq!(challenge.stats().attempt_count(), 1);
    assert_eq!(challenge.presenter().histories.len(), history_calls);
    assert_eq!(&challenge.presenter().last_stats().unwrap()[1..], &stats_before[..]);

    // No stale frame may render once idle.
    let readouts = challenge.presenter().readouts.len();
    for _ in 0..10 {
        clock.advance(Duration::from_millis(16));
        challenge.on_tick();
    }
    assert_eq!(challenge.presenter().readouts.len(), readouts);
}

#[test]
fn independent_sessions_do_not_share_state() {
    let (clock_a, mut a) = headless(3.0);
    let (_clock_b, b) = headless(4.0);
    a.start_or_stop();
    clock_a.advance_secs(3.0);
    a.start_or_stop();
    assert_eq!(a.history().len(), 1);
    assert!(b.history().is_empty());
    assert_eq!(b.target().secs(), 4.0);
}
