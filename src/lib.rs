//! Danmaku simulation core.
//!
//! A headless bullet-pattern engine: pooled bodies that move by speed and
//! heading, emitters that clone prototype bodies in point or ring patterns,
//! and timelines of actions that animate any named property over time.
//!
//! The crate exposes its components, resources, systems, and events for
//! integration tests and for hosts that want to drive the `bevy_ecs` world
//! themselves. Most hosts only need [`simulation::Simulation`].

pub mod color;
pub mod components;
pub mod error;
pub mod events;
pub mod geometry;
pub mod instruction;
pub mod pool;
pub mod resources;
pub mod simulation;
pub mod systems;
