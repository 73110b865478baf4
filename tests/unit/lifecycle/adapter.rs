use super::*;
use crate::runtime::scheduler::EventLoop;
use crate::stage::memory::{MemoryStage, NodeId};

fn wrapper(opts: ConfettiOptions) -> (MemoryStage, NodeId, EventLoop, Confetti<MemoryStage, EventLoop>) {
    let stage = MemoryStage::new();
    let container = stage.create_container().unwrap();
    let ev = EventLoop::new();
    let c = Confetti::new(stage.clone(), container, ev.clone(), opts).unwrap();
    (stage, container, ev, c)
}

#[test]
fn nothing_renders_before_explode() {
    let (stage, container, _ev, c) = wrapper(ConfettiOptions::new().particle_count(5));
    assert_eq!(c.phase(), Phase::Idle);
    assert!(c.handle().is_none());
    assert!(stage.children(container).is_empty());
}

#[test]
fn explode_returns_the_nominal_duration() {
    let (stage, container, ev, mut c) =
        wrapper(ConfettiOptions::new().particle_count(5).duration_ms(1200));
    assert_eq!(c.explode().unwrap(), Duration::from_millis(1200));
    assert_eq!(stage.children(container).len(), 5);
    ev.run_until_idle();
    assert_eq!(c.phase(), Phase::Settled);
}

#[test]
fn set_options_forwards_to_the_live_burst() {
    let (stage, container, _ev, mut c) = wrapper(ConfettiOptions::new().particle_count(4));
    c.explode().unwrap();
    c.set_options(&ConfettiOptions::new().particle_count(7)).unwrap();
    assert_eq!(stage.children(container).len(), 7);
    assert_eq!(c.options().particle_count, Some(7));
}

#[test]
fn invalid_options_are_rejected_everywhere() {
    let stage = MemoryStage::new();
    let container = stage.create_container().unwrap();
    assert!(
        Confetti::new(
            stage.clone(),
            container,
            EventLoop::new(),
            ConfettiOptions::new().force(9.0)
        )
        .is_err()
    );

    let (_stage, _container, _ev, mut c) = wrapper(ConfettiOptions::new().particle_count(2));
    assert!(c.set_options(&ConfettiOptions::new().force(-1.0)).is_err());
    assert_eq!(c.options().force, None);
}

#[test]
fn re_explode_replaces_the_previous_timer() {
    let (_stage, _container, ev, mut c) = wrapper(ConfettiOptions::new().particle_count(2));
    c.explode().unwrap();
    ev.run_microtasks();
    c.explode().unwrap();
    ev.run_microtasks();
    assert_eq!(ev.pending_timers(), 1);
}

#[test]
fn destroy_stops_the_cleanup() {
    let (stage, container, ev, mut c) = wrapper(ConfettiOptions::new().particle_count(3));
    c.explode().unwrap();
    c.destroy();
    ev.run_until_idle();
    assert_eq!(c.phase(), Phase::Destroyed);
    assert_eq!(stage.children(container).len(), 3);
}
