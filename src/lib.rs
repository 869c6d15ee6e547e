//! Simulation core of a small top-down shooter.
//!
//! The host (the terminal front end in `main.rs`, or anything else) owns the
//! frame loop: it feeds `compute::tick` a `FrameInput` and a time step and
//! draws whatever state comes back.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod level;
pub mod logging;
pub mod persistence;
pub mod physics;
