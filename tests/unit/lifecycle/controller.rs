use super::*;
use crate::runtime::scheduler::EventLoop;
use crate::stage::memory::{MemoryStage, NodeId};

fn setup() -> (MemoryStage, NodeId, EventLoop) {
    let stage = MemoryStage::new();
    let container = stage.create_container().unwrap();
    (stage, container, EventLoop::new())
}

fn boom(
    stage: &MemoryStage,
    container: NodeId,
    ev: &EventLoop,
    opts: ConfettiOptions,
) -> ConfettiHandle<MemoryStage, EventLoop> {
    explode(stage.clone(), container, &opts, ev.clone()).unwrap()
}

#[test]
fn explode_materializes_one_unit_per_particle() {
    let (stage, container, ev) = setup();
    let h = boom(
        &stage,
        container,
        &ev,
        ConfettiOptions::new()
            .particle_count(6)
            .colors(["red", "blue"])
            .seed(1),
    );

    assert_eq!(h.phase(), Phase::Exploding);
    let units = stage.children(container);
    assert_eq!(units, h.units());
    assert_eq!(units.len(), 6);
    assert!(stage.classes(container).contains(&CONTAINER_CLASS.to_string()));
    assert_eq!(stage.property(container, "--sh").as_deref(), Some("800px"));
    assert_eq!(stage.stylesheet_installs(), 1);

    for (i, unit) in units.iter().enumerate() {
        assert_eq!(stage.classes(*unit), vec![PARTICLE_CLASS.to_string()]);
        let expected = if i % 2 == 0 { "red" } else { "blue" };
        assert_eq!(stage.property(*unit, "--bgc").as_deref(), Some(expected));
        assert_eq!(stage.children(*unit).len(), 1);
        for var in ["--xlp", "--dc", "--x4", "--y4", "--w", "--h", "--r", "--hr", "--rd", "--br"] {
            assert!(stage.property(*unit, var).is_some(), "{var} missing");
        }
    }
}

#[test]
fn invalid_options_touch_nothing() {
    let (stage, container, ev) = setup();
    let before = stage.elements_created();
    let err = explode(
        stage.clone(),
        container,
        &ConfettiOptions::new().force(1.5),
        ev.clone(),
    )
    .err()
    .unwrap();
    assert!(err.is_configuration());
    assert_eq!(stage.elements_created(), before);
    assert!(stage.children(container).is_empty());
    assert!(stage.classes(container).is_empty());
    assert!(!stage.has_stylesheet());
    assert_eq!(ev.pending_microtasks(), 0);
}

#[test]
fn timer_is_armed_after_the_current_task() {
    let (stage, container, ev) = setup();
    let h = boom(&stage, container, &ev, ConfettiOptions::new().particle_count(3));
    assert!(!h.cleanup_armed());
    assert_eq!(ev.pending_timers(), 0);
    ev.run_microtasks();
    assert!(h.cleanup_armed());
    assert_eq!(ev.pending_timers(), 1);
}

#[test]
fn cleanup_clears_the_container_after_duration() {
    let (stage, container, ev) = setup();
    let h = boom(
        &stage,
        container,
        &ev,
        ConfettiOptions::new().particle_count(4).duration_ms(1000),
    );
    ev.advance(Duration::from_millis(999));
    assert_eq!(stage.children(container).len(), 4);
    ev.advance(Duration::from_millis(1));
    assert!(stage.children(container).is_empty());
    assert_eq!(h.phase(), Phase::Settled);
    assert_eq!(h.unit_count(), 0);
    assert!(!h.cleanup_armed());
}

#[test]
fn recolor_keeps_unit_identity() {
    let (stage, container, ev) = setup();
    let h = boom(
        &stage,
        container,
        &ev,
        ConfettiOptions::new().particle_count(10).colors(["red"]),
    );
    let before = stage.children(container);
    let rotations: Vec<_> = before.iter().map(|u| stage.property(*u, "--r")).collect();
    let created = stage.elements_created();

    h.update(&ConfettiOptions::new().colors(["green", "gold"]))
        .unwrap();

    let after = stage.children(container);
    assert_eq!(before, after);
    assert_eq!(stage.elements_created(), created);
    for (i, unit) in after.iter().enumerate() {
        let expected = if i % 2 == 0 { "green" } else { "gold" };
        assert_eq!(stage.property(*unit, "--bgc").as_deref(), Some(expected));
        assert_eq!(stage.property(*unit, "--r"), rotations[i]);
    }
    assert_eq!(h.particles()[1].color, "gold");
    assert_eq!(h.config().particle_count, 10);
}

#[test]
fn opting_out_of_cleanup_cancels_the_timer() {
    let (stage, container, ev) = setup();
    let h = boom(
        &stage,
        container,
        &ev,
        ConfettiOptions::new()
            .particle_count(10)
            .destroy_after_done(true),
    );
    ev.run_microtasks();
    assert!(h.cleanup_armed());

    h.update(&ConfettiOptions::new().destroy_after_done(false))
        .unwrap();
    assert!(!h.cleanup_armed());
    assert_eq!(ev.pending_timers(), 0);

    ev.advance(Duration::from_millis(5000));
    assert_eq!(stage.children(container).len(), 10);
    assert_eq!(h.phase(), Phase::Exploding);
}

#[test]
fn opting_out_before_arming_drops_the_deferred_arm() {
    let (stage, container, ev) = setup();
    let h = boom(&stage, container, &ev, ConfettiOptions::new().particle_count(2));
    h.update(&ConfettiOptions::new().destroy_after_done(false))
        .unwrap();
    ev.run_until_idle();
    assert!(!h.cleanup_armed());
    assert_eq!(stage.children(container).len(), 2);
}

#[test]
fn count_change_rebuilds_and_rearms() {
    let (stage, container, ev) = setup();
    let h = boom(
        &stage,
        container,
        &ev,
        ConfettiOptions::new().particle_count(10).duration_ms(1000),
    );
    let old = stage.children(container);
    ev.advance(Duration::from_millis(600));

    h.update(&ConfettiOptions::new().particle_count(5).duration_ms(2000))
        .unwrap();
    let new = stage.children(container);
    assert_eq!(new.len(), 5);
    assert!(new.iter().all(|u| !old.contains(u)));
    assert_eq!(h.particles().len(), 5);

    ev.run_microtasks();
    assert_eq!(ev.pending_timers(), 1);

    ev.advance(Duration::from_millis(1000));
    assert_eq!(stage.children(container).len(), 5);
    ev.advance(Duration::from_millis(1000));
    assert!(stage.children(container).is_empty());
    assert_eq!(h.phase(), Phase::Settled);
}

#[test]
fn repeated_rebuilds_keep_at_most_one_timer() {
    let (stage, container, ev) = setup();
    let h = boom(&stage, container, &ev, ConfettiOptions::new().particle_count(3));
    for n in [4u32, 5, 6, 7] {
        h.update(&ConfettiOptions::new().particle_count(n)).unwrap();
        ev.run_microtasks();
        assert!(ev.pending_timers() <= 1);
    }
    assert_eq!(ev.pending_timers(), 1);
    assert_eq!(ev.run_until_idle(), 1);
}

#[test]
fn destroy_cancels_and_freezes_the_instance() {
    let (stage, container, ev) = setup();
    let h = boom(&stage, container, &ev, ConfettiOptions::new().particle_count(8));
    ev.run_microtasks();
    h.destroy();
    assert_eq!(h.phase(), Phase::Destroyed);
    assert_eq!(ev.pending_timers(), 0);

    let before = stage.children(container);
    h.update(&ConfettiOptions::new().particle_count(3).colors(["x"]))
        .unwrap();
    assert_eq!(ev.run_until_idle(), 0);
    assert_eq!(stage.children(container), before);
    assert_eq!(before.len(), 8);
    assert_eq!(h.phase(), Phase::Destroyed);
}

#[test]
fn destroy_before_arming_prevents_the_timer() {
    let (stage, container, ev) = setup();
    let h = boom(&stage, container, &ev, ConfettiOptions::new().particle_count(2));
    h.destroy();
    assert_eq!(ev.run_until_idle(), 0);
    assert_eq!(stage.children(container).len(), 2);
}

#[test]
fn invalid_update_is_rejected_without_changes() {
    let (stage, container, ev) = setup();
    let h = boom(&stage, container, &ev, ConfettiOptions::new().particle_count(4));
    let before = stage.children(container);
    let cfg = h.config();

    let empty: [&str; 0] = [];
    assert!(h.update(&ConfettiOptions::new().colors(empty)).is_err());
    assert!(
        h.update(&ConfettiOptions::new().particle_count(9).force(3.0))
            .is_err()
    );
    assert_eq!(h.config(), cfg);
    assert_eq!(stage.children(container), before);
}

#[test]
fn stage_height_is_always_reapplied() {
    let (stage, container, ev) = setup();
    let h = boom(&stage, container, &ev, ConfettiOptions::new().particle_count(2));
    h.update(&ConfettiOptions::new().stage_height(320.5)).unwrap();
    assert_eq!(stage.property(container, "--sh").as_deref(), Some("320.5px"));
}

#[test]
fn updates_after_settling_are_silent() {
    let (stage, container, ev) = setup();
    let h = boom(
        &stage,
        container,
        &ev,
        ConfettiOptions::new().particle_count(3).duration_ms(10),
    );
    ev.run_until_idle();
    assert_eq!(h.phase(), Phase::Settled);

    h.update(&ConfettiOptions::new().colors(["teal"])).unwrap();
    assert!(stage.children(container).is_empty());

    h.update(&ConfettiOptions::new().particle_count(2)).unwrap();
    assert_eq!(h.phase(), Phase::Exploding);
    assert_eq!(stage.children(container).len(), 2);
}

#[test]
fn seeded_explosions_are_reproducible() {
    let render = || {
        let (stage, container, ev) = setup();
        let _h = boom(
            &stage,
            container,
            &ev,
            ConfettiOptions::new().particle_count(12).seed(42),
        );
        stage.render_node(container).unwrap()
    };
    assert_eq!(render(), render());
}

#[test]
fn stylesheet_is_installed_once_per_stage() {
    let (stage, container, ev) = setup();
    let second = stage.create_container().unwrap();
    let _a = boom(&stage, container, &ev, ConfettiOptions::new().particle_count(1));
    let _b = boom(&stage, second, &ev, ConfettiOptions::new().particle_count(1));
    assert_eq!(stage.stylesheet_installs(), 1);
}

#[test]
fn dropping_the_handle_keeps_the_cleanup() {
    let (stage, container, ev) = setup();
    drop(boom(
        &stage,
        container,
        &ev,
        ConfettiOptions::new().particle_count(3),
    ));
    ev.run_until_idle();
    assert!(stage.children(container).is_empty());
}
