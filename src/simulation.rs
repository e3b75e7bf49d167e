//! The top-level simulation context.
//!
//! [`Simulation`] owns a `bevy_ecs` [`World`] holding every registry as a
//! resource, and the [`Schedule`] that advances them. The host calls
//! [`Simulation::advance`] once per frame; pausing is simply not calling it.
//!
//! Per frame, in order:
//!
//! 1. `update_world_time` – scale `dt`, bump the frame counter
//! 2. `timeline_system` – free timelines, then applied body timelines
//! 3. `emitter_system` – spawn clones, fast-forward each by its tick age
//! 4. `movement_system` – integrate active bodies
//! 5. `cull_system` – mark off-screen / timeline-ended bodies
//! 6. `compact_system` – recycle marked bodies, admit new ones, drop
//!    finished timelines
//! 7. `update_property_faults` – age the fault queue
//!
//! # Example
//!
//! ```ignore
//! let mut sim = Simulation::new(SimulationConfig::default())?;
//! let bullet = sim.spawn(Body::bullet().with_position(512.0, 384.0).with_motion(100.0, 90.0));
//! for _ in 0..60 {
//!     sim.advance(1.0 / 60.0);
//! }
//! for (_, body) in sim.bodies().iter() {
//!     draw(body.position, body.color, body.opacity(), body.scale);
//! }
//! ```

use bevy_ecs::prelude::*;
use log::info;

use crate::components::body::{Body, BodyHandle};
use crate::components::collision::Shape;
use crate::components::emitter::{Emitter, EmitterHandle};
use crate::components::timeline::{Target, Timeline};
use crate::error::{PoolError, PropertyError, SimError};
use crate::events::fault::PropertyFault;
use crate::instruction::Instruction;
use crate::pool::Lifecycle;
use crate::resources::actionupdater::{ActionUpdater, TimelineHandle};
use crate::resources::bodyupdater::BodyUpdater;
use crate::resources::emitters::Emitters;
use crate::resources::namedobjects::NamedObjects;
use crate::resources::properties::{PropertyRegistry, PropertyTarget, PropertyType, Reflect, Value};
use crate::resources::simconfig::SimulationConfig;
use crate::resources::worldbounds::WorldBounds;
use crate::resources::worldtime::WorldTime;
use crate::systems::compact::compact_system;
use crate::systems::cull::cull_system;
use crate::systems::emitter::emitter_system;
use crate::systems::faults::update_property_faults;
use crate::systems::movement::movement_system;
use crate::systems::time::update_world_time;
use crate::systems::timeline::timeline_system;

pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    /// Build a world with empty registries and the built-in property tables.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        let mut world = World::new();

        let mut registry = PropertyRegistry::default();
        registry.register_type::<Body>()?;
        registry.register_type::<Emitter>()?;
        world.insert_resource(registry);

        world.insert_resource(WorldTime {
            time_scale: config.time_scale,
            ..Default::default()
        });
        world.insert_resource(WorldBounds(config.world));
        world.init_resource::<BodyUpdater>();
        world.init_resource::<ActionUpdater>();
        world.init_resource::<Emitters>();
        world.init_resource::<NamedObjects>();
        world.init_resource::<Messages<PropertyFault>>();
        world.insert_resource(config);

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

        Ok(Self { world, schedule })
    }

    /// Advance the simulation by `dt` seconds of host time.
    pub fn advance(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
    }

    pub fn time(&self) -> WorldTime {
        *self.world.resource::<WorldTime>()
    }

    pub fn config(&self) -> &SimulationConfig {
        self.world.resource::<SimulationConfig>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // ---------------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------------

    pub fn registry(&self) -> &PropertyRegistry {
        self.world.resource::<PropertyRegistry>()
    }

    /// Make another type scriptable.
    pub fn register_type<T: Reflect>(&mut self) -> Result<(), SimError> {
        Ok(self
            .world
            .resource_mut::<PropertyRegistry>()
            .register_type::<T>()?)
    }

    /// Attach a write-only named setter to `T` for loaders.
    pub fn register_setter<T: Reflect, V: PropertyType + 'static>(
        &mut self,
        name: &str,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Result<(), SimError> {
        Ok(self
            .world
            .resource_mut::<PropertyRegistry>()
            .register_setter(name, set)?)
    }

    pub fn get_property(&mut self, target: Target, name: &str) -> Result<Value, SimError> {
        self.with_target(target, |object| object.get_property(name))
    }

    pub fn set_property(
        &mut self,
        target: Target,
        name: &str,
        value: Value,
    ) -> Result<(), SimError> {
        self.with_target(target, |object| object.set_property(name, value))
    }

    fn with_target<R>(
        &mut self,
        target: Target,
        f: impl FnOnce(&mut dyn PropertyTarget) -> Result<R, PropertyError>,
    ) -> Result<R, SimError> {
        self.world
            .resource_scope(|world, registry: Mut<PropertyRegistry>| -> Result<R, SimError> {
                match target {
                Target::Body(handle) => {
                    let bodies = world.resource_mut::<BodyUpdater>().into_inner();
                    let body = bodies.get_mut(handle).ok_or(PoolError::UseAfterDestroy {
                        index: handle.index(),
                    })?;
                    Ok(f(&mut registry.bind(body))?)
                }
                Target::Emitter(handle) => {
                    let emitters = world.resource_mut::<Emitters>().into_inner();
                    let emitter = emitters.get_mut(handle).ok_or(PoolError::UseAfterDestroy {
                        index: handle.index(),
                    })?;
                    Ok(f(&mut registry.bind(emitter))?)
                }
                }
            })
    }

    // ---------------------------------------------------------------------
    // Bodies
    // ---------------------------------------------------------------------

    /// Store a body that is never moved itself, only cloned by emitters.
    pub fn add_prototype(&mut self, body: Body) -> BodyHandle {
        self.bodies_mut().construct(body)
    }

    /// Construct and activate a body in one step.
    pub fn spawn(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies_mut().construct(body);
        // A freshly constructed slot always accepts activation.
        let _ = self.activate_body(handle);
        handle
    }

    pub fn clone_body(&mut self, source: BodyHandle) -> Result<BodyHandle, SimError> {
        Ok(self.bodies_mut().clone_body(source)?)
    }

    /// Constructed → Active. The body updates from the next frame on.
    pub fn activate_body(&mut self, handle: BodyHandle) -> Result<(), SimError> {
        let mut bodies = self.world.resource_mut::<BodyUpdater>();
        bodies.activate(handle)?;
        bodies.flush_incoming();
        let has_timeline = bodies.get(handle).is_some_and(Body::has_timeline);
        if has_timeline {
            self.world
                .resource_mut::<ActionUpdater>()
                .register_body(handle);
        }
        Ok(())
    }

    /// Destroy a body immediately.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), SimError> {
        Ok(self.bodies_mut().destroy(handle)?)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies().get(handle)
    }

    /// Timelines given to an active body through this reference start
    /// running at the next [`Simulation::advance`].
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies_mut().get_mut(handle)
    }

    /// A body's applied timeline, created on first access. Active bodies get
    /// it driven from the next frame on.
    pub fn applied_timeline(&mut self, handle: BodyHandle) -> Result<&mut Timeline, SimError> {
        let state = self.bodies().state(handle);
        if state == Some(Lifecycle::Active) {
            self.world
                .resource_mut::<ActionUpdater>()
                .register_body(handle);
        }
        let body = self
            .bodies_mut()
            .get_mut(handle)
            .ok_or(PoolError::UseAfterDestroy {
                index: handle.index(),
            })?;
        Ok(body.applied_timeline())
    }

    /// Active bodies, for rendering and queries.
    pub fn bodies(&self) -> &BodyUpdater {
        self.world.resource::<BodyUpdater>()
    }

    fn bodies_mut(&mut self) -> &mut BodyUpdater {
        self.world.resource_mut::<BodyUpdater>().into_inner()
    }

    pub fn body_count(&self) -> usize {
        self.bodies().len()
    }

    /// Active bodies on `layer` (or any layer) that collide with `shape`.
    pub fn collided_bodies(&self, shape: &Shape, layer: Option<i32>) -> Vec<BodyHandle> {
        self.bodies()
            .iter()
            .filter(|(_, body)| layer.is_none_or(|l| body.layer == l))
            .filter(|(_, body)| shape.collides(*body))
            .map(|(handle, _)| handle)
            .collect()
    }

    // ---------------------------------------------------------------------
    // Emitters and timelines
    // ---------------------------------------------------------------------

    pub fn add_emitter(&mut self, emitter: Emitter) -> EmitterHandle {
        self.world.resource_mut::<Emitters>().add(emitter)
    }

    pub fn emitter(&self, handle: EmitterHandle) -> Option<&Emitter> {
        self.world.resource::<Emitters>().get(handle)
    }

    pub fn emitter_mut(&mut self, handle: EmitterHandle) -> Option<&mut Emitter> {
        self.world
            .resource_mut::<Emitters>()
            .into_inner()
            .get_mut(handle)
    }

    pub fn remove_emitter(&mut self, handle: EmitterHandle) -> Result<(), SimError> {
        Ok(self.world.resource_mut::<Emitters>().remove(handle)?)
    }

    /// Start a free timeline.
    pub fn add_timeline(&mut self, timeline: Timeline) -> TimelineHandle {
        self.world.resource_mut::<ActionUpdater>().add(timeline)
    }

    /// Start a free timeline bound to `target`.
    pub fn bind_timeline(&mut self, target: Target, mut timeline: Timeline) -> TimelineHandle {
        timeline.bind(target);
        self.add_timeline(timeline)
    }

    pub fn timeline(&self, handle: TimelineHandle) -> Option<&Timeline> {
        self.world.resource::<ActionUpdater>().get(handle)
    }

    pub fn timeline_mut(&mut self, handle: TimelineHandle) -> Option<&mut Timeline> {
        self.world
            .resource_mut::<ActionUpdater>()
            .into_inner()
            .get_mut(handle)
    }

    pub fn remove_timeline(&mut self, handle: TimelineHandle) -> bool {
        self.world.resource_mut::<ActionUpdater>().remove(handle)
    }

    // ---------------------------------------------------------------------
    // Named objects and instructions
    // ---------------------------------------------------------------------

    pub fn name_object(&mut self, name: impl Into<String>, target: Target) {
        self.world
            .resource_mut::<NamedObjects>()
            .insert(name, target);
    }

    pub fn lookup(&self, name: &str) -> Result<Target, SimError> {
        self.world
            .resource::<NamedObjects>()
            .get(name)
            .ok_or_else(|| SimError::UnknownObject(name.to_string()))
    }

    /// Apply one loader instruction. Malformed instructions are rejected
    /// before anything is scheduled.
    pub fn apply_instruction(&mut self, instruction: &Instruction) -> Result<(), SimError> {
        let name = instruction.object();
        let target = self.lookup(name)?;
        if let Instruction::Set {
            property, value, ..
        } = instruction
        {
            return self.set_property(target, property, value.clone());
        }
        let Some(action) = instruction.to_action()? else {
            return Ok(());
        };

        let existing = self
            .world
            .resource::<NamedObjects>()
            .script(name)
            .filter(|&handle| self.timeline(handle).is_some());
        let handle = match existing {
            Some(handle) => handle,
            None => {
                let handle = self.bind_timeline(target, Timeline::new());
                self.world
                    .resource_mut::<NamedObjects>()
                    .set_script(name, handle);
                handle
            }
        };
        if let Some(timeline) = self.timeline_mut(handle) {
            timeline.add(action);
        }
        Ok(())
    }

    /// Apply a whole script, stopping at the first error.
    pub fn apply_script(&mut self, instructions: &[Instruction]) -> Result<(), SimError> {
        for instruction in instructions {
            self.apply_instruction(instruction)?;
        }
        info!("Applied {} instructions", instructions.len());
        Ok(())
    }

    /// Take every fault reported since the last call.
    pub fn drain_faults(&mut self) -> Vec<PropertyFault> {
        self.world
            .resource_mut::<Messages<PropertyFault>>()
            .drain()
            .collect()
    }
}
