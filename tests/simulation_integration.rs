//! End-to-end tests driving the `Simulation` facade frame by frame.

use danmaku::color::Color;
use danmaku::components::action::Action;
use danmaku::components::body::Body;
use danmaku::components::collision::Shape;
use danmaku::components::emitter::Emitter;
use danmaku::components::timeline::{Target, Timeline};
use danmaku::components::tween::Easing;
use danmaku::error::{ActionError, PropertyError, SimError};
use danmaku::geometry::Vector2;
use danmaku::instruction::{Instruction, parse_script};
use danmaku::resources::properties::Value;
use danmaku::resources::simconfig::SimulationConfig;
use danmaku::simulation::Simulation;

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn sim() -> Simulation {
    Simulation::new(SimulationConfig::default()).unwrap()
}

fn float(sim: &mut Simulation, target: Target, name: &str) -> f32 {
    sim.get_property(target, name)
        .unwrap()
        .as_float()
        .unwrap()
}

fn run(sim: &mut Simulation, frames: usize, dt: f32) {
    for _ in 0..frames {
        sim.advance(dt);
    }
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn nan_opacity_is_stored_as_transparent() {
    let mut sim = sim();
    let body = Target::Body(sim.spawn(Body::new().with_position(100.0, 100.0)));
    sim.set_property(body, "Opacity", Value::Float(f32::NAN)).unwrap();
    assert_eq!(float(&mut sim, body, "Opacity"), 0.0);
}

#[test]
fn property_set_then_get_round_trips() {
    let mut sim = sim();
    let body = Target::Body(sim.spawn(Body::new().with_position(100.0, 100.0)));

    let cases = [
        ("Position", Value::Vector2(Vector2::new(10.0, 20.0))),
        ("X", Value::Float(42.0)),
        ("Color", Value::Color(Color::RED)),
        ("Scale", Value::Float(1.5)),
        ("Layer", Value::Int(7)),
        ("Angle", Value::Float(270.0)),
        ("Speed", Value::Float(33.0)),
        ("IsFrozen", Value::Bool(true)),
        ("Texture", Value::Enum("bullet.png".into())),
    ];
    for (name, value) in cases {
        sim.set_property(body, name, value.clone()).unwrap();
        assert_eq!(sim.get_property(body, name).unwrap(), value, "{}", name);
    }
}

#[test]
fn opacity_and_radius_are_clamped() {
    let mut sim = sim();
    let body = Target::Body(sim.spawn(Body::new().with_position(100.0, 100.0)));

    sim.set_property(body, "Opacity", Value::Float(2.0)).unwrap();
    assert_eq!(float(&mut sim, body, "Opacity"), 1.0);
    sim.set_property(body, "Opacity", Value::Float(-0.5)).unwrap();
    assert_eq!(float(&mut sim, body, "Opacity"), 0.0);
    sim.set_property(body, "Radius", Value::Float(-3.0)).unwrap();
    assert_eq!(float(&mut sim, body, "Radius"), 0.0);
}

#[test]
fn property_errors_are_reported_to_the_caller() {
    let mut sim = sim();
    let body = Target::Body(sim.spawn(Body::new().with_position(100.0, 100.0)));

    assert!(matches!(
        sim.get_property(body, "Nope"),
        Err(SimError::Property(PropertyError::UnknownProperty { .. }))
    ));
    assert!(matches!(
        sim.set_property(body, "Speed", Value::Bool(true)),
        Err(SimError::Property(PropertyError::TypeMismatch { .. }))
    ));
    assert!(matches!(
        sim.set_property(body, "IsBullet", Value::Bool(true)),
        Err(SimError::Property(PropertyError::NotWritable { .. }))
    ));
    assert!(matches!(
        sim.get_property(body, "Type"),
        Err(SimError::Property(PropertyError::NotReadable { .. }))
    ));
}

#[test]
fn registered_setter_is_reachable_by_name() {
    let mut sim = sim();
    sim.register_setter::<Body, f32>("Size", |b, v| b.scale = v * 0.5)
        .unwrap();
    let h = sim.spawn(Body::new().with_position(100.0, 100.0));
    sim.set_property(Target::Body(h), "Size", Value::Float(4.0))
        .unwrap();
    assert_eq!(sim.body(h).unwrap().scale, 2.0);
}

// =============================================================================
// Timelines
// =============================================================================

#[test]
fn animate_to_reaches_target_for_any_step_size() {
    for dt in [1.0_f32, 0.3, 0.1, 0.07, 1.0 / 60.0] {
        let mut sim = sim();
        let h = sim.spawn(Body::new().with_position(100.0, 100.0));
        sim.bind_timeline(
            Target::Body(h),
            Timeline::from_actions([Action::animate_to(
                "Scale",
                Value::Float(4.0),
                1.0,
                Easing::CubicInOut,
            )
            .unwrap()]),
        );
        let frames = (1.0 / dt).ceil() as usize + 1;
        run(&mut sim, frames, dt);
        assert_eq!(sim.body(h).unwrap().scale, 4.0, "dt = {}", dt);
    }
}

#[test]
fn animate_by_ends_at_base_plus_delta() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_position(10.0, 100.0));
    sim.bind_timeline(
        Target::Body(h),
        Timeline::from_actions([Action::animate_by(
            "X",
            Value::Float(5.0),
            0.5,
            Easing::ExponentialIn,
        )
        .unwrap()]),
    );
    run(&mut sim, 7, 0.1);
    assert_eq!(sim.body(h).unwrap().position.x, 15.0);
}

#[test]
fn sleep_overflow_carries_into_next_action() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_position(0.0, 100.0));
    sim.bind_timeline(
        Target::Body(h),
        Timeline::from_actions([
            Action::sleep(0.25).unwrap(),
            Action::sleep(0.25).unwrap(),
            Action::animate_to("X", Value::Float(10.0), 1.0, Easing::Linear).unwrap(),
        ]),
    );
    sim.advance(0.75);
    assert!(approx_eq(sim.body(h).unwrap().position.x, 2.5));
}

#[test]
fn infinite_loop_never_completes() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_position(100.0, 100.0));
    let tl = sim.bind_timeline(
        Target::Body(h),
        Timeline::from_actions([Action::repeat(
            -1,
            [
                Action::animate_to("X", Value::Float(200.0), 0.1, Easing::Linear).unwrap(),
                Action::animate_to("X", Value::Float(100.0), 0.1, Easing::Linear).unwrap(),
            ],
        )
        .unwrap()]),
    );
    run(&mut sim, 500, 0.03);
    sim.advance(100.0);
    let timeline = sim.timeline(tl).expect("loop timeline dropped");
    assert!(!timeline.is_complete());
}

#[test]
fn finished_free_timeline_is_dropped() {
    let mut sim = sim();
    let tl = sim.add_timeline(Timeline::from_actions([Action::sleep(0.1).unwrap()]));
    sim.advance(0.05);
    assert!(sim.timeline(tl).is_some());
    sim.advance(0.05);
    assert!(sim.timeline(tl).is_none());
}

#[test]
fn timeline_on_destroyed_body_goes_inert() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_position(100.0, 100.0));
    let tl = sim.bind_timeline(
        Target::Body(h),
        Timeline::from_actions([
            Action::animate_to("X", Value::Float(0.0), 1.0, Easing::Linear).unwrap(),
        ]),
    );
    sim.advance(0.1);
    sim.destroy_body(h).unwrap();
    sim.advance(0.1);
    assert!(sim.timeline(tl).is_none());
    assert!(sim.drain_faults().is_empty());
}

#[test]
fn faults_do_not_stop_the_frame() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_position(100.0, 100.0));
    let mover = sim.spawn(Body::new().with_position(100.0, 200.0).with_motion(100.0, 0.0));
    sim.bind_timeline(
        Target::Body(h),
        Timeline::from_actions([
            Action::animate_to("Missing", Value::Float(1.0), 0.5, Easing::Linear).unwrap(),
            Action::animate_to("Speed", Value::Float(100.0), 1.0, Easing::Linear).unwrap(),
        ]),
    );
    sim.advance(0.25);

    let faults = sim.drain_faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].target, Some(Target::Body(h)));
    assert_eq!(faults[0].target_type, "Body");
    assert!(matches!(
        faults[0].error,
        PropertyError::UnknownProperty { .. }
    ));
    assert!(approx_eq(sim.body(h).unwrap().speed(), 25.0));
    assert!(approx_eq(sim.body(mover).unwrap().position.x, 125.0));
    assert!(sim.drain_faults().is_empty());
}

// =============================================================================
// Bodies
// =============================================================================

#[test]
fn body_integrates_to_hundred_in_ten_steps() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_motion(100.0, 0.0));
    run(&mut sim, 10, 0.1);
    let body = sim.body(h).unwrap();
    assert!(approx_eq(body.position.x, 100.0));
    assert!(approx_eq(body.position.y, 0.0));
}

#[test]
fn frozen_body_does_not_move() {
    let mut sim = sim();
    let mut body = Body::new().with_position(100.0, 100.0).with_motion(100.0, 0.0);
    body.is_frozen = true;
    let h = sim.spawn(body);
    run(&mut sim, 5, 0.1);
    assert_eq!(sim.body(h).unwrap().position, Vector2::new(100.0, 100.0));
}

#[test]
fn prototype_is_neither_moved_nor_counted() {
    let mut sim = sim();
    let h = sim.add_prototype(Body::new().with_position(100.0, 100.0).with_motion(50.0, 0.0));
    run(&mut sim, 3, 0.1);
    assert_eq!(sim.body_count(), 0);
    assert_eq!(sim.body(h).unwrap().position.x, 100.0);
}

#[test]
fn off_screen_body_is_destroyed() {
    let mut sim = sim();
    let leaving = sim.spawn(Body::new().with_position(1000.0, 384.0).with_motion(1000.0, 0.0));
    let mut stays = Body::new().with_position(1000.0, 300.0).with_motion(1000.0, 0.0);
    stays.destroy_when_move_off_screen = false;
    let stays = sim.spawn(stays);

    sim.advance(0.05);
    assert!(sim.body(leaving).is_some());
    sim.advance(0.05);
    assert!(sim.body(leaving).is_none());
    assert!(sim.body(stays).is_some());
    assert_eq!(sim.body_count(), 1);
}

#[test]
fn timeline_end_destroys_body() {
    let mut sim = sim();
    let mut body = Body::new().with_position(100.0, 100.0);
    body.destroy_when_timeline_end = true;
    body.applied_timeline().add(Action::sleep(0.2).unwrap());
    let h = sim.spawn(body);

    sim.advance(0.1);
    assert!(sim.body(h).is_some());
    sim.advance(0.15);
    assert!(sim.body(h).is_none());
}

#[test]
fn cloned_body_progresses_independently() {
    let mut sim = sim();
    let mut body = Body::new().with_position(100.0, 100.0);
    body.applied_timeline()
        .add(Action::animate_to("Scale", Value::Float(3.0), 1.0, Easing::Linear).unwrap());
    let original = sim.spawn(body);
    sim.advance(0.5);

    let copy = sim.clone_body(original).unwrap();
    sim.activate_body(copy).unwrap();
    assert!(approx_eq(sim.body(copy).unwrap().scale, 2.0));

    // Restarting the copy's timeline must not touch the original.
    sim.applied_timeline(copy).unwrap().reset();
    sim.advance(0.25);
    assert!(approx_eq(sim.body(original).unwrap().scale, 2.5));
    assert!(approx_eq(sim.body(copy).unwrap().scale, 2.25));

    sim.destroy_body(original).unwrap();
    sim.advance(1.0);
    assert_eq!(sim.body(copy).unwrap().scale, 3.0);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "double free")]
fn double_destroy_aborts_in_debug() {
    let mut sim = sim();
    let h = sim.spawn(Body::new());
    sim.destroy_body(h).unwrap();
    let _ = sim.destroy_body(h);
}

#[test]
#[cfg(not(debug_assertions))]
fn double_destroy_is_an_error() {
    let mut sim = sim();
    let h = sim.spawn(Body::new());
    sim.destroy_body(h).unwrap();
    assert!(matches!(
        sim.destroy_body(h),
        Err(SimError::Pool(danmaku::error::PoolError::DoubleFree { .. }))
    ));
    assert!(sim.body(h).is_none());
}

#[test]
fn timeline_added_through_body_mut_runs() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_position(100.0, 100.0));
    sim.body_mut(h)
        .unwrap()
        .applied_timeline()
        .add(Action::animate_to("Scale", Value::Float(3.0), 1.0, Easing::Linear).unwrap());
    sim.advance(0.5);
    assert!(approx_eq(sim.body(h).unwrap().scale, 2.0));
    sim.advance(0.5);
    assert_eq!(sim.body(h).unwrap().scale, 3.0);
}

#[test]
fn stale_handle_never_resolves_to_new_body() {
    let mut sim = sim();
    let old = sim.spawn(Body::new());
    sim.destroy_body(old).unwrap();
    let new = sim.spawn(Body::new().with_position(5.0, 5.0));
    assert_eq!(old.index(), new.index());
    assert!(sim.body(old).is_none());
    assert!(sim.body(new).is_some());
}

#[test]
fn circle_collision_is_strict() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_position(100.0, 100.0).with_radius(10.0));
    let touching = Shape::Circle {
        center: Vector2::new(120.0, 100.0),
        radius: 10.0,
    };
    let overlapping = Shape::Circle {
        center: Vector2::new(119.99, 100.0),
        radius: 10.0,
    };
    assert!(sim.collided_bodies(&touching, None).is_empty());
    assert_eq!(sim.collided_bodies(&overlapping, None), vec![h]);
}

#[test]
fn collision_query_filters_by_layer() {
    let mut sim = sim();
    let mut enemy = Body::new().with_position(100.0, 100.0).with_radius(5.0);
    enemy.layer = 2;
    let enemy = sim.spawn(enemy);
    sim.spawn(Body::new().with_position(100.0, 100.0).with_radius(5.0));
    let probe = Shape::Circle {
        center: Vector2::new(100.0, 100.0),
        radius: 1.0,
    };
    assert_eq!(sim.collided_bodies(&probe, None).len(), 2);
    assert_eq!(sim.collided_bodies(&probe, Some(2)), vec![enemy]);
}

// =============================================================================
// Emitters
// =============================================================================

#[test]
fn emitter_spawns_hundred_bodies_per_second() {
    let mut sim = sim();
    let proto = sim.add_prototype(Body::new().with_position(512.0, 384.0));
    let e = sim.add_emitter(Emitter::point(proto, 0.01).unwrap());
    run(&mut sim, 100, 0.01);
    assert_eq!(sim.emitter(e).unwrap().spawned_total(), 100);
    assert_eq!(sim.body_count(), 100);
}

#[test]
fn emitter_spawns_hundred_bodies_in_one_large_step() {
    let mut sim = sim();
    let proto = sim.add_prototype(Body::new().with_position(512.0, 384.0));
    let e = sim.add_emitter(Emitter::point(proto, 0.01).unwrap());
    sim.advance(1.0);
    assert_eq!(sim.emitter(e).unwrap().spawned_total(), 100);
    assert_eq!(sim.body_count(), 100);
}

#[test]
fn catch_up_spawns_are_fast_forwarded_by_age() {
    let mut sim = sim();
    let proto = sim.add_prototype(Body::new().with_position(100.0, 100.0).with_motion(100.0, 0.0));
    sim.add_emitter(Emitter::point(proto, 0.1).unwrap());
    sim.advance(0.35);

    let xs: Vec<f32> = sim.bodies().iter().map(|(_, b)| b.position.x).collect();
    assert_eq!(xs.len(), 3);
    assert!(approx_eq(xs[0], 125.0));
    assert!(approx_eq(xs[1], 115.0));
    assert!(approx_eq(xs[2], 105.0));
}

#[test]
fn annular_emitter_spreads_clones_on_a_ring() {
    let mut sim = sim();
    let proto = sim.add_prototype(Body::new().with_position(100.0, 100.0));
    let mut ring = Emitter::annular(proto, 1.0, 4).unwrap();
    ring.radius = 10.0;
    sim.add_emitter(ring);
    sim.advance(1.0);

    let bodies: Vec<(f32, f32, f32)> = sim
        .bodies()
        .iter()
        .map(|(_, b)| (b.position.x, b.position.y, b.angle()))
        .collect();
    assert_eq!(bodies.len(), 4);
    let expected = [(110.0, 100.0, 0.0), (100.0, 110.0, 90.0), (90.0, 100.0, 180.0), (100.0, 90.0, 270.0)];
    for ((x, y, angle), (ex, ey, ea)) in bodies.into_iter().zip(expected) {
        assert!(approx_eq(x, ex), "x {} vs {}", x, ex);
        assert!(approx_eq(y, ey), "y {} vs {}", y, ey);
        assert!(approx_eq(angle, ea), "angle {} vs {}", angle, ea);
    }
}

#[test]
fn emitter_budget_is_finite() {
    let mut sim = sim();
    let proto = sim.add_prototype(Body::new().with_position(100.0, 100.0));
    let e = sim.add_emitter(Emitter::point(proto, 0.1).unwrap().with_budget(3).unwrap());
    run(&mut sim, 10, 0.1);
    let emitter = sim.emitter(e).unwrap();
    assert_eq!(emitter.spawned_total(), 3);
    assert!(emitter.is_exhausted());
    assert_eq!(sim.body_count(), 3);
}

#[test]
fn emitter_callback_customises_each_spawn() {
    let mut sim = sim();
    let mut proto = Body::new().with_position(100.0, 100.0);
    proto.applied_timeline().add(Action::sleep(4.5).unwrap());
    let proto = sim.add_prototype(proto);
    let e = Emitter::point(proto, 0.1)
        .unwrap()
        .with_budget(2)
        .unwrap()
        .with_callback(|view, body| {
            body.layer = view.spawned_total as i32 + 10;
            if let Some(Action::Sleep(sleep)) = body.applied_timeline().actions_mut().get_mut(0) {
                sleep.set_duration(1.0).unwrap();
            }
        });
    sim.add_emitter(e);
    sim.advance(0.2);

    let layers: Vec<i32> = sim.bodies().iter().map(|(_, b)| b.layer).collect();
    assert_eq!(layers, vec![10, 11]);
    for (_, body) in sim.bodies().iter() {
        match &body.timeline().unwrap().actions()[0] {
            Action::Sleep(sleep) => assert_eq!(sleep.duration, 1.0),
            other => panic!("unexpected {:?}", other),
        }
    }
    let proto_sleep = &sim.body(proto).unwrap().timeline().unwrap().actions()[0];
    assert!(matches!(proto_sleep, Action::Sleep(s) if s.duration == 4.5));
}

#[test]
fn emitter_properties_are_animatable() {
    let mut sim = sim();
    let proto = sim.add_prototype(Body::new().with_position(100.0, 100.0));
    let e = sim.add_emitter(Emitter::annular(proto, 10.0, 8).unwrap());
    sim.bind_timeline(
        Target::Emitter(e),
        Timeline::from_actions([
            Action::animate_to("Radius", Value::Float(200.0), 1.0, Easing::Linear).unwrap(),
        ]),
    );
    sim.advance(0.5);
    assert!(approx_eq(float(&mut sim, Target::Emitter(e), "Radius"), 100.0));
    assert!(matches!(
        sim.set_property(Target::Emitter(e), "Interval", Value::Float(0.0)),
        Err(SimError::Property(PropertyError::InvalidValue { .. }))
    ));
}

#[test]
fn removed_emitter_stops_spawning() {
    let mut sim = sim();
    let proto = sim.add_prototype(Body::new().with_position(100.0, 100.0));
    let e = sim.add_emitter(Emitter::point(proto, 0.1).unwrap());
    sim.advance(0.1);
    sim.remove_emitter(e).unwrap();
    sim.advance(1.0);
    assert_eq!(sim.body_count(), 1);
    assert!(sim.emitter(e).is_none());
}

// =============================================================================
// Instructions and time
// =============================================================================

#[test]
fn script_drives_named_objects() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_position(100.0, 100.0));
    sim.name_object("Bullet", Target::Body(h));

    let script = parse_script(
        r#"[
            { "op": "set", "object": "Bullet", "property": "Layer", "value": { "Int": 3 } },
            { "op": "animate_to", "object": "Bullet", "property": "Opacity",
              "to": { "Float": 0.5 }, "duration": 0.2 },
            { "op": "sleep", "object": "Bullet", "duration": 0.1 },
            { "op": "animate_by", "object": "Bullet", "property": "X",
              "by": { "Float": 10.0 }, "duration": 0.1, "easing": "QuadOut" }
        ]"#,
    )
    .unwrap();
    sim.apply_script(&script).unwrap();
    assert_eq!(sim.body(h).unwrap().layer, 3);

    run(&mut sim, 6, 0.1);
    let body = sim.body(h).unwrap();
    assert_eq!(body.opacity(), 0.5);
    assert_eq!(body.position.x, 110.0);

    // The finished script timeline is replaced by a fresh one.
    sim.apply_instruction(&Instruction::AnimateTo {
        object: "Bullet".into(),
        property: "X".into(),
        to: Value::Float(0.0),
        duration: 0.1,
        easing: Easing::Linear,
    })
    .unwrap();
    run(&mut sim, 2, 0.1);
    assert_eq!(sim.body(h).unwrap().position.x, 0.0);
}

#[test]
fn malformed_instructions_are_rejected() {
    let mut sim = sim();
    let h = sim.spawn(Body::new().with_position(100.0, 100.0));
    sim.name_object("Bullet", Target::Body(h));

    assert_eq!(
        sim.apply_instruction(&Instruction::Sleep {
            object: "Nobody".into(),
            duration: 1.0,
        }),
        Err(SimError::UnknownObject("Nobody".into()))
    );
    assert_eq!(
        sim.apply_instruction(&Instruction::AnimateTo {
            object: "Bullet".into(),
            property: "X".into(),
            to: Value::Float(1.0),
            duration: 0.0,
            easing: Easing::Linear,
        }),
        Err(SimError::Action(ActionError::InvalidDuration(0.0)))
    );
    assert!(sim.lookup("Bullet").is_ok());
}

#[test]
fn time_scale_slows_the_world() {
    let mut config = SimulationConfig::default();
    config.time_scale = 0.5;
    let mut sim = Simulation::new(config).unwrap();
    let h = sim.spawn(Body::new().with_position(100.0, 100.0).with_motion(100.0, 0.0));
    run(&mut sim, 2, 0.1);
    let time = sim.time();
    assert!(approx_eq(time.elapsed, 0.1));
    assert_eq!(time.frame_count, 2);
    assert!(approx_eq(sim.body(h).unwrap().position.x, 110.0));
}
