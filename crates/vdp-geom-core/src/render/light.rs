//! Lighting collaborator hooks.
//!
//! The pipeline only fixes when lighting runs, not what it does:
//! once per mesh after the vertex transform, once per visible polygon after
//! orientation, and once per frame after the command chain is submitted.

use super::mesh::{Attribute, Mesh};
use super::polygon::PolygonState;
use crate::math::Mat43;

pub trait Lighting {
    /// Called after every mesh point has been projected. `view` is the
    /// combined view * world transform used for the projection.
    fn mesh_transformed(&mut self, _mesh: &Mesh<'_>, _view: &Mat43) {}

    /// Called for each polygon that survived culling, before its record is
    /// written. May change the working shading slot or draw mode.
    fn polygon_process(&mut self, _polygon: &mut PolygonState, _attribute: &Attribute) {}

    /// Called once after the frame's chain is handed to the display.
    fn frame_end(&mut self) {}
}

/// Lighting that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLighting;

impl Lighting for NoLighting {}
