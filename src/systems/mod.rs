//! Simulation systems.
//!
//! Submodules overview
//! - [`compact`] – recycle marked bodies, admit spawned ones, drop finished timelines
//! - [`cull`] – mark bodies that left the world or finished their timeline
//! - [`emitter`] – spawn prototype clones and fast-forward them by tick age
//! - [`faults`] – age the property fault queue
//! - [`movement`] – integrate positions from speed and heading
//! - [`time`] – update simulation time and delta
//! - [`timeline`] – advance free and applied timelines

pub mod compact;
pub mod cull;
pub mod emitter;
pub mod faults;
pub mod movement;
pub mod time;
pub mod timeline;
