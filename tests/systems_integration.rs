//! System-level tests: a hand-built world ticked through single systems or
//! short chains, without the `Simulation` facade.

use bevy_ecs::prelude::*;

use danmaku::components::action::Action;
use danmaku::components::body::Body;
use danmaku::components::emitter::Emitter;
use danmaku::components::timeline::{Target, Timeline};
use danmaku::components::tween::Easing;
use danmaku::events::fault::PropertyFault;
use danmaku::geometry::{BoundingBox, Vector2};
use danmaku::resources::actionupdater::ActionUpdater;
use danmaku::resources::bodyupdater::BodyUpdater;
use danmaku::resources::emitters::Emitters;
use danmaku::resources::properties::{PropertyRegistry, Value};
use danmaku::resources::worldbounds::WorldBounds;
use danmaku::resources::worldtime::WorldTime;
use danmaku::systems::compact::compact_system;
use danmaku::systems::cull::cull_system;
use danmaku::systems::emitter::emitter_system;
use danmaku::systems::faults::update_property_faults;
use danmaku::systems::movement::movement_system;
use danmaku::systems::time::update_world_time;
use danmaku::systems::timeline::timeline_system;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> World {
    let mut world = World::new();
    let mut registry = PropertyRegistry::default();
    registry.register_type::<Body>().unwrap();
    registry.register_type::<Emitter>().unwrap();
    world.insert_resource(registry);
    world.insert_resource(WorldTime::default());
    world.insert_resource(WorldBounds(BoundingBox::new(
        Vector2::new(0.0, 0.0),
        Vector2::new(100.0, 100.0),
    )));
    world.init_resource::<BodyUpdater>();
    world.init_resource::<ActionUpdater>();
    world.init_resource::<Emitters>();
    world.init_resource::<Messages<PropertyFault>>();
    world
}

fn full_frame() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            timeline_system,
            emitter_system,
            movement_system,
            cull_system,
            compact_system,
            update_property_faults,
        )
            .chain(),
    );
    schedule
}

fn spawn(world: &mut World, body: Body) -> danmaku::components::body::BodyHandle {
    let mut bodies = world.resource_mut::<BodyUpdater>();
    let h = bodies.construct(body);
    bodies.activate(h).unwrap();
    bodies.flush_incoming();
    h
}

// =============================================================================
// Movement
// =============================================================================

#[test]
fn movement_integrates_speed_and_heading() {
    let mut world = make_world();
    let h = spawn(&mut world, Body::new().with_position(10.0, 10.0).with_motion(20.0, 90.0));
    let mut schedule = Schedule::default();
    schedule.add_systems(movement_system);

    update_world_time(&mut world, 0.5);
    schedule.run(&mut world);

    let body = world.resource::<BodyUpdater>().get(h).unwrap().clone();
    assert!(approx_eq(body.position.x, 10.0));
    assert!(approx_eq(body.position.y, 20.0));
}

#[test]
fn movement_does_nothing_on_zero_delta() {
    let mut world = make_world();
    let h = spawn(&mut world, Body::new().with_position(10.0, 10.0).with_motion(20.0, 0.0));
    let mut schedule = Schedule::default();
    schedule.add_systems(movement_system);

    update_world_time(&mut world, 0.0);
    schedule.run(&mut world);

    let bodies = world.resource::<BodyUpdater>();
    assert_eq!(bodies.get(h).unwrap().position, Vector2::new(10.0, 10.0));
}

// =============================================================================
// Cull and compaction
// =============================================================================

#[test]
fn cull_marks_and_compact_recycles() {
    let mut world = make_world();
    let outside = spawn(&mut world, Body::new().with_position(150.0, 50.0));
    let inside = spawn(&mut world, Body::new().with_position(50.0, 50.0));

    let mut cull = Schedule::default();
    cull.add_systems(cull_system);
    cull.run(&mut world);
    {
        let bodies = world.resource::<BodyUpdater>();
        // Marked but still stored until compaction.
        assert!(bodies.get(outside).is_some());
        assert_eq!(bodies.len(), 2);
    }

    let mut compact = Schedule::default();
    compact.add_systems(compact_system);
    compact.run(&mut world);
    let bodies = world.resource::<BodyUpdater>();
    assert!(bodies.get(outside).is_none());
    assert!(bodies.get(inside).is_some());
    assert_eq!(bodies.active(), &[inside]);
}

#[test]
fn radius_keeps_body_alive_on_the_edge() {
    let mut world = make_world();
    let h = spawn(&mut world, Body::new().with_position(105.0, 50.0).with_radius(10.0));
    let mut schedule = full_frame();
    update_world_time(&mut world, 0.1);
    schedule.run(&mut world);
    assert!(world.resource::<BodyUpdater>().get(h).is_some());
}

// =============================================================================
// Timelines and emitters in one frame
// =============================================================================

#[test]
fn timeline_changes_are_visible_to_movement_in_the_same_frame() {
    let mut world = make_world();
    let h = spawn(&mut world, Body::new().with_position(10.0, 50.0));
    let mut tl = Timeline::from_actions([
        Action::animate_to("Speed", Value::Float(40.0), 0.1, Easing::Linear).unwrap(),
    ]);
    tl.bind(Target::Body(h));
    world.resource_mut::<ActionUpdater>().add(tl);

    let mut schedule = full_frame();
    update_world_time(&mut world, 0.5);
    schedule.run(&mut world);

    let bodies = world.resource::<BodyUpdater>();
    assert!(approx_eq(bodies.get(h).unwrap().position.x, 30.0));
}

#[test]
fn spawned_bodies_join_active_list_at_frame_end() {
    let mut world = make_world();
    let proto = world
        .resource_mut::<BodyUpdater>()
        .construct(Body::new().with_position(50.0, 50.0).with_motion(10.0, 0.0));
    world
        .resource_mut::<Emitters>()
        .add(Emitter::point(proto, 0.25).unwrap());

    let mut schedule = full_frame();
    update_world_time(&mut world, 0.5);
    schedule.run(&mut world);

    let bodies = world.resource::<BodyUpdater>();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies.pending_len(), 0);
    assert_eq!(bodies.live_len(), 3);
    let xs: Vec<f32> = bodies.iter().map(|(_, b)| b.position.x).collect();
    // Aged 0.25s and 0s; neither is moved a second time by movement_system.
    assert!(approx_eq(xs[0], 52.5));
    assert!(approx_eq(xs[1], 50.0));
}

#[test]
fn property_faults_reach_message_readers() {
    let mut world = make_world();
    let h = spawn(&mut world, Body::new().with_position(50.0, 50.0));
    let mut tl = Timeline::from_actions([
        Action::animate_to("Opacity", Value::Bool(true), 1.0, Easing::Linear).unwrap(),
    ]);
    tl.bind(Target::Body(h));
    world.resource_mut::<ActionUpdater>().add(tl);

    let mut schedule = Schedule::default();
    schedule.add_systems(timeline_system);
    update_world_time(&mut world, 0.1);
    schedule.run(&mut world);

    let faults: Vec<PropertyFault> = world
        .resource_mut::<Messages<PropertyFault>>()
        .drain()
        .collect();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].target, Some(Target::Body(h)));
    assert_eq!(faults[0].error.property(), "Opacity");
}
