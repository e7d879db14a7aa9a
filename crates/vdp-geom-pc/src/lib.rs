//! PC host for the VDP geometry pipeline.
//!
//! Drives `vdp-geom-core` with the software divider and a no-op interrupt
//! controller, rendering the demo cube grid into an in-memory command table
//! that can be dumped to disk for inspection.

pub mod display;
pub mod error;
pub mod scene;

use std::path::PathBuf;

use vdp_geom_core::math::{fix16, Angle};
use vdp_geom_core::platform::{NoInterrupts, SoftDivider};
use vdp_geom_core::render::command::DrawCommand;
use vdp_geom_core::render::light::NoLighting;
use vdp_geom_core::{EmitOutcome, PassStats, RenderContext};

pub use display::CommandTable;
pub use error::HostError;

use display::POOL_BASE;
use scene::CubeGrid;

/// Settings for one demo run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub fov_degrees: f32,
    pub near_level: u32,
    pub far: i16,
    pub frames: u32,
    pub columns: u16,
    pub rows: u16,
    /// Write the last frame's command table here.
    pub dump: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near_level: 7,
            far: 1024,
            frames: 60,
            columns: 4,
            rows: 3,
            dump: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u32,
    /// Frames whose chain was submitted rather than skipped.
    pub submitted_frames: u32,
    pub total_emitted: u64,
    pub last_frame: PassStats,
    /// Command table slots in use after the last frame.
    pub last_frame_slots: usize,
}

/// Render `options.frames` frames of the demo scene.
pub fn run(options: &RunOptions) -> Result<RunSummary, HostError> {
    let mut ctx = RenderContext::new(SoftDivider::new(), NoInterrupts);
    let projection = ctx.projection_mut();
    projection.set_field_of_view(Angle::from_degrees_f32(options.fov_degrees));
    projection.set_near_level(options.near_level);
    projection.set_far(fix16(options.far));

    log::info!(
        "Projection: view distance {}, near {}, far {}",
        ctx.projection().view_distance(),
        ctx.projection().near(),
        ctx.projection().far()
    );

    let textures = scene::demo_textures()?;
    let camera = scene::demo_camera();
    let grid = CubeGrid::new(options.columns, options.rows);
    let mut table = CommandTable::new();
    let mut lighting = NoLighting;
    let mut summary = RunSummary::default();

    log::info!(
        "Rendering {} frames of {} cubes",
        options.frames,
        grid.cube_count()
    );

    for frame in 0..options.frames {
        ctx.frame_start();
        table.begin_frame();

        let stats = grid.render(&mut ctx, frame, &camera, &mut lighting, &textures)?;

        let mut call_site = DrawCommand::default();
        let outcome = ctx.emit(&mut call_site, POOL_BASE, &mut table, &mut lighting);
        table.set_call_site(&call_site);

        if let EmitOutcome::Submitted { count } = outcome {
            summary.submitted_frames += 1;
            log::debug!("Frame {}: {} records, entry {:?}", frame, count, table.entry());
        }

        summary.frames += 1;
        summary.total_emitted += u64::from(stats.emitted);
        summary.last_frame = stats;
        summary.last_frame_slots = table.used_slots().len();
    }

    log::info!(
        "Done: {} frames, {} submitted, {} records emitted",
        summary.frames,
        summary.submitted_frames,
        summary.total_emitted
    );

    if let Some(path) = &options.dump {
        table.dump(path)?;
    }

    Ok(summary)
}
