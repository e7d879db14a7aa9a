//! Fixed-point geometry pipeline for a command-table display processor.
//!
//! Projects quad meshes into screen space, culls what cannot be seen,
//! buckets the survivors by depth and links them into one command chain
//! that the display processor walks as a subroutine.

#![cfg_attr(not(test), no_std)]

pub mod camera;
pub mod config;
pub mod math;
pub mod platform;
pub mod render;

pub use config::Projection;
pub use render::{DisplaySubmit, EmitOutcome, PassStats, RenderContext, RenderError};
