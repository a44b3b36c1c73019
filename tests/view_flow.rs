// Landing → viewer flow: one-directional, fires once, on time.

use skyline_panorama::landing::{LandingPhase, EXIT_DURATION, MOUNT_DELAY};
use skyline_panorama::view::{Transition, ViewFlow, ViewState};
use std::time::{Duration, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn transition_fires_exactly_once_exactly_on_time() {
    let t0 = Instant::now();
    let mut flow = ViewFlow::new(t0, true);
    flow.tick(t0 + MOUNT_DELAY);

    let trigger = t0 + ms(500);
    flow.enter(trigger);
    // 快速连续点击不会推迟或重复
    flow.enter(trigger + ms(10));
    flow.enter(trigger + ms(700));

    let mut fired = Vec::new();
    for step in 0..=400 {
        let now = trigger + ms(step * 5);
        if let Some(t) = flow.tick(now) {
            fired.push((t, now));
        }
    }

    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].0, Transition::EnteredViewer);
    assert_eq!(fired[0].1, trigger + EXIT_DURATION);
    assert!(flow.is_viewer());
}

#[test]
fn no_transition_without_trigger() {
    let t0 = Instant::now();
    let mut flow = ViewFlow::new(t0, true);
    for step in 0..100 {
        assert_eq!(flow.tick(t0 + ms(step * 100)), None);
    }
    assert!(!flow.is_viewer());
    assert_eq!(flow.landing().map(|l| l.phase()), Some(LandingPhase::Visible));
}

#[test]
fn viewer_never_returns_to_landing() {
    let t0 = Instant::now();
    let mut flow = ViewFlow::new(t0, true);
    flow.enter(t0);
    assert_eq!(flow.tick(t0 + EXIT_DURATION), Some(Transition::EnteredViewer));

    flow.enter(t0 + EXIT_DURATION);
    for step in 1..50 {
        assert_eq!(flow.tick(t0 + EXIT_DURATION + ms(step * 100)), None);
    }
    assert!(matches!(flow.state(), ViewState::Viewer));
}

#[test]
fn late_tick_still_fires_once() {
    let t0 = Instant::now();
    let mut flow = ViewFlow::new(t0, true);
    flow.enter(t0 + ms(200));
    assert_eq!(flow.tick(t0 + ms(1699)), None);
    assert_eq!(flow.tick(t0 + ms(5000)), Some(Transition::EnteredViewer));
    assert_eq!(flow.tick(t0 + ms(6000)), None);
}
