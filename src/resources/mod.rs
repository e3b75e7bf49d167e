//! ECS resources made available to systems.
//!
//! Every registry of the simulation lives in the `bevy_ecs` world as a
//! resource, so systems borrow exactly what they touch.
//!
//! Overview
//! - `actionupdater` – free timelines plus the bodies whose applied timeline is driven
//! - `bodyupdater` – the body pool, its active list, and deferred destruction
//! - `emitters` – the emitter pool
//! - `namedobjects` – string names for loader instructions
//! - `properties` – the property registry: named, typed, interpolatable fields
//! - `simconfig` – INI-backed settings (world box, update rate, time scale)
//! - `worldbounds` – box outside of which bodies are culled
//! - `worldtime` – simulation time and delta
pub mod actionupdater;
pub mod bodyupdater;
pub mod emitters;
pub mod namedobjects;
pub mod properties;
pub mod simconfig;
pub mod worldbounds;
pub mod worldtime;
