//! Per-frame geometry pass and command chain emission.
//!
//! A frame is `frame_start()`, one `render_mesh()` per mesh, then `emit()`.
//! Everything the pass touches lives inline in [`RenderContext`] and is
//! reused every frame.

pub mod command;
pub mod cull;
pub mod depth;
pub mod light;
pub mod mesh;
pub mod orient;
pub mod polygon;
pub mod pool;
pub mod sort;
pub mod texture;
pub mod transform;

use vdp_geom_hal::{DivisionUnit, InterruptControl};

use crate::camera::ViewSource;
use crate::config::Projection;
use crate::math::{fix16_int32_mul, Fix16, Mat43, MatrixStack, ScreenPoint};

use command::{DrawCommand, LinkType};
use light::Lighting;
use mesh::{Attribute, Mesh, PlaneType};
use polygon::PolygonState;
use pool::CommandPool;
use sort::{BucketSort, DepthSort};
use texture::{Texture, TextureLookup};

pub use pool::CMDT_POOL_CAPACITY;

/// Maximum number of points in a single mesh.
pub const POINTS_POOL_CAPACITY: usize = 1024;

/// Errors that abort a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// More polygons survived culling than the command pool holds.
    PoolExhausted { capacity: usize },
    /// The depth sort ran out of entries.
    SortExhausted { capacity: usize },
    /// The mesh has more points than the scratch buffers hold.
    TooManyPoints { points: usize, capacity: usize },
    /// A textured polygon names a slot the texture table does not have.
    UnknownTexture(u16),
}

impl core::fmt::Display for RenderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RenderError::PoolExhausted { capacity } => {
                write!(f, "command pool exhausted ({capacity} records)")
            }
            RenderError::SortExhausted { capacity } => {
                write!(f, "depth sort exhausted ({capacity} entries)")
            }
            RenderError::TooManyPoints { points, capacity } => {
                write!(f, "mesh has {points} points, at most {capacity} supported")
            }
            RenderError::UnknownTexture(slot) => write!(f, "no texture in slot {slot}"),
        }
    }
}

impl core::error::Error for RenderError {}

/// Display-submission collaborator.
pub trait DisplaySubmit {
    /// Queue the frame's records for transfer to the command table.
    ///
    /// `commands[i]` belongs in slot `pool_base + i`. `entry` is the pool
    /// index the draw-call site links to.
    fn submit(&mut self, commands: &[DrawCommand], pool_base: u16, entry: u16);
}

/// Polygon counts for one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    pub polygons: u32,
    pub backface_culled: u32,
    pub near_culled: u32,
    pub offscreen_culled: u32,
    pub emitted: u32,
}

impl core::ops::AddAssign for PassStats {
    fn add_assign(&mut self, rhs: Self) {
        self.polygons += rhs.polygons;
        self.backface_culled += rhs.backface_culled;
        self.near_culled += rhs.near_culled;
        self.offscreen_culled += rhs.offscreen_culled;
        self.emitted += rhs.emitted;
    }
}

/// Result of [`RenderContext::emit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Nothing was visible; the call site skips the subroutine.
    Skipped,
    /// `count` records were linked and submitted.
    Submitted { count: usize },
}

/// Render state passed explicitly to every pipeline call.
pub struct RenderContext<D, I, S = BucketSort> {
    projection: Projection,
    divider: D,
    interrupts: I,
    sort: S,
    pool: CommandPool,
    screen_points: [ScreenPoint; POINTS_POOL_CAPACITY],
    z_values: [Fix16; POINTS_POOL_CAPACITY],
    view_matrix: Mat43,
    polygon: PolygonState,
}

impl<D: DivisionUnit, I: InterruptControl> RenderContext<D, I, BucketSort> {
    /// Context with the default projection and bucket sort, ready for a
    /// frame.
    pub fn new(divider: D, interrupts: I) -> Self {
        Self::with_sort(divider, interrupts, BucketSort::new())
    }
}

impl<D: DivisionUnit, I: InterruptControl, S: DepthSort> RenderContext<D, I, S> {
    pub fn with_sort(divider: D, interrupts: I, sort: S) -> Self {
        let mut context = Self {
            projection: Projection::new(),
            divider,
            interrupts,
            sort,
            pool: CommandPool::new(),
            screen_points: [ScreenPoint::default(); POINTS_POOL_CAPACITY],
            z_values: [Fix16::ZERO; POINTS_POOL_CAPACITY],
            view_matrix: Mat43::IDENTITY,
            polygon: PolygonState::default(),
        };
        context.frame_start();
        context
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }

    /// Combined view * world transform of the most recent pass.
    pub fn view_matrix(&self) -> &Mat43 {
        &self.view_matrix
    }

    /// Records written so far this frame.
    pub fn commands(&self) -> &[DrawCommand] {
        self.pool.as_slice()
    }

    pub fn visible_count(&self) -> usize {
        self.pool.len()
    }

    pub fn sort(&self) -> &S {
        &self.sort
    }

    /// Discard the previous frame's records and depth buckets.
    pub fn frame_start(&mut self) {
        self.pool.reset();
        self.sort.reset();
    }

    /// Transform, cull and queue every polygon of `mesh`.
    ///
    /// Interrupts stay masked for the whole pass and are restored on every
    /// exit path. On error the pass stops; records already queued stay in
    /// the pool until the next `frame_start()`.
    pub fn render_mesh<V, L, T>(
        &mut self,
        mesh: &Mesh<'_>,
        world: &MatrixStack,
        camera: &V,
        lighting: &mut L,
        textures: &T,
    ) -> Result<PassStats, RenderError>
    where
        V: ViewSource + ?Sized,
        L: Lighting + ?Sized,
        T: TextureLookup + ?Sized,
    {
        let level = self.interrupts.mask_all();
        let result = self.transform_and_cull(mesh, world, camera, lighting, textures);
        self.interrupts.restore(level);

        match &result {
            Ok(stats) => log::debug!(
                "pass: {} polygons, {} backface, {} near, {} offscreen, {} emitted ({} this frame)",
                stats.polygons,
                stats.backface_culled,
                stats.near_culled,
                stats.offscreen_culled,
                stats.emitted,
                self.pool.len()
            ),
            Err(e) => log::warn!("pass aborted: {}", e),
        }

        result
    }

    fn transform_and_cull<V, L, T>(
        &mut self,
        mesh: &Mesh<'_>,
        world: &MatrixStack,
        camera: &V,
        lighting: &mut L,
        textures: &T,
    ) -> Result<PassStats, RenderError>
    where
        V: ViewSource + ?Sized,
        L: Lighting + ?Sized,
        T: TextureLookup + ?Sized,
    {
        let points = mesh.points();
        if points.len() > POINTS_POOL_CAPACITY {
            return Err(RenderError::TooManyPoints {
                points: points.len(),
                capacity: POINTS_POOL_CAPACITY,
            });
        }

        let Self {
            projection,
            divider,
            sort,
            pool,
            screen_points,
            z_values,
            view_matrix,
            polygon,
            ..
        } = self;

        *view_matrix = camera.view_inverse() * *world.top();

        transform::transform_points(
            points,
            view_matrix,
            projection,
            divider,
            &mut screen_points[..points.len()],
            &mut z_values[..points.len()],
        );

        lighting.mesh_transformed(mesh, view_matrix);

        let mut stats = PassStats::default();

        for (source, attribute) in mesh.polygons().iter().zip(mesh.attributes()) {
            stats.polygons += 1;

            polygon.load_screen_points(source, &screen_points[..]);
            polygon.control = attribute.control;

            if attribute.plane != PlaneType::Double && cull::is_backfacing(&polygon.screen_points) {
                stats.backface_culled += 1;
                continue;
            }

            polygon.draw_mode = attribute.draw_mode;
            polygon.load_z_values(source, &z_values[..]);

            let depth = depth::depth_metric(attribute.sort, &polygon.z_values);

            // Polygons crossing the near plane are dropped whole
            if depth < projection.near() {
                stats.near_culled += 1;
                continue;
            }

            cull::compute_clip_flags(polygon);

            if !polygon.and_flags.is_empty() {
                stats.offscreen_culled += 1;
                continue;
            }

            polygon.indices = source.indices;
            polygon.shading_slot = attribute.shading_slot;

            orient::prepare_clipping(polygon);

            lighting.polygon_process(polygon, attribute);

            let texture = resolve_texture(attribute, textures)?;
            let link = pool.push(DrawCommand::assemble(polygon, attribute, texture))?;

            let scaled_depth = fix16_int32_mul(depth, projection.sort_scale());
            // Pool and sort must hold the same records
            if let Err(e) = sort.insert(link, scaled_depth) {
                pool.pop();
                return Err(e);
            }

            stats.emitted += 1;
        }

        Ok(stats)
    }

    /// Link this frame's records into one chain in depth order and submit it.
    ///
    /// `call_site` is the command the display processor runs before the
    /// chain; it becomes a subroutine call into the chain, or plain
    /// fall-through when nothing is visible. `pool_base` is the command-table
    /// slot that receives pool index 0.
    pub fn emit<P, L>(
        &mut self,
        call_site: &mut DrawCommand,
        pool_base: u16,
        display: &mut P,
        lighting: &mut L,
    ) -> EmitOutcome
    where
        P: DisplaySubmit + ?Sized,
        L: Lighting + ?Sized,
    {
        let count = self.pool.len();

        if count == 0 {
            call_site.link_type = LinkType::JumpNext;

            return EmitOutcome::Skipped;
        }

        let commands = self.pool.as_mut_slice();
        let mut entry = None;
        let mut previous: Option<u16> = None;

        self.sort.iterate_ascending(&mut |index: u16| {
            let target = pool_base.wrapping_add(index);
            match previous {
                Some(p) => commands[p as usize].link = target,
                None => {
                    call_site.link = target;
                    entry = Some(index);
                }
            }
            previous = Some(index);
        });

        let (Some(entry), Some(last)) = (entry, previous) else {
            log::warn!("{} records queued but none sorted, skipping frame", count);
            call_site.link_type = LinkType::JumpNext;

            return EmitOutcome::Skipped;
        };

        commands[last as usize].link_type = LinkType::JumpReturn;
        call_site.link_type = LinkType::JumpCall;

        display.submit(self.pool.as_slice(), pool_base, entry);

        lighting.frame_end();

        log::debug!("emitted {} commands at slot {}", count, pool_base);

        EmitOutcome::Submitted { count }
    }
}

fn resolve_texture<T>(attribute: &Attribute, textures: &T) -> Result<Option<Texture>, RenderError>
where
    T: TextureLookup + ?Sized,
{
    match attribute.texture_slot {
        Some(slot) => textures
            .get_by_slot(slot)
            .map(Some)
            .ok_or(RenderError::UnknownTexture(slot)),
        None => Ok(None),
    }
}
