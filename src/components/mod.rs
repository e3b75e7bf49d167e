//! Simulation object types.
//!
//! These are plain data types stored in the pooled registries under
//! [`crate::resources`], not ECS components attached to entities.
//!
//! Submodules overview:
//! - [`action`] – animate/sleep/group/loop actions and the sequence that runs them
//! - [`body`] – a moving, drawable, scriptable object (bullets included)
//! - [`collision`] – hitboxes, query shapes, and body-versus-shape tests
//! - [`emitter`] – spawns clones of a prototype body in point or ring patterns
//! - [`timeline`] – binds a sequence of actions to the object it animates
//! - [`tween`] – easing curves shared by every animation

pub mod action;
pub mod body;
pub mod collision;
pub mod emitter;
pub mod timeline;
pub mod tween;
