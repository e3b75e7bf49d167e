//! Messages written by the simulation systems.
//!
//! Submodules:
//! - [`fault`] – property errors raised by timelines mid-frame
pub mod fault;
