//! Demo scene: a grid of spinning cubes, two faces textured.

use glam::Vec3;
use vdp_geom_core::camera::Camera;
use vdp_geom_core::math::{Angle, FixVec3, MatrixStack};
use vdp_geom_core::render::light::Lighting;
use vdp_geom_core::render::mesh::{
    Attribute, ColorMode, CommandKind, Control, DrawMode, Mesh, MeshError, Palette, Polygon,
};
use vdp_geom_core::render::sort::DepthSort;
use vdp_geom_core::render::texture::{Texture, TextureList, TEXTURE_LIST_CAPACITY};
use vdp_geom_core::{PassStats, RenderContext};
use vdp_geom_hal::{DivisionUnit, InterruptControl};

use crate::HostError;

// RGB555 with the MSB set
pub const RED: u16 = 0x801F;
pub const GREEN: u16 = 0x83E0;
pub const BLUE: u16 = 0xFC00;
pub const YELLOW: u16 = 0x83FF;

/// Two 32x32 RGB tiles, back to back in VRAM.
pub const DEMO_TEXTURES: [Texture; 2] = [
    Texture::new(0x0000, 32, 32),
    Texture::new(0x0800, 32, 32),
];

/// Point index bit 0/1/2 set means +X/+Y/+Z.
const CUBE_FACES: [[u16; 4]; 6] = [
    [0, 2, 3, 1], // -Z
    [4, 5, 7, 6], // +Z
    [0, 4, 6, 2], // -X
    [1, 3, 7, 5], // +X
    [0, 1, 5, 4], // -Y
    [2, 6, 7, 3], // +Y
];

/// Depth of the grid centre in world space.
pub const GRID_DEPTH: i16 = 240;
const GRID_SPACING: i16 = 48;
const CUBE_HALF_SIZE: i16 = 12;

/// Load the demo textures into a fresh texture table.
pub fn demo_textures() -> Result<TextureList, HostError> {
    let mut textures = TextureList::new();
    for texture in DEMO_TEXTURES {
        textures
            .push(texture)
            .map_err(|_| HostError::TextureTableFull {
                capacity: TEXTURE_LIST_CAPACITY,
            })?;
    }
    Ok(textures)
}

/// Camera above and in front of the grid, looking at its centre.
pub fn demo_camera() -> Camera {
    Camera::look_at(
        Vec3::new(0.0, -50.0, -40.0),
        Vec3::new(0.0, 0.0, GRID_DEPTH as f32),
        Vec3::NEG_Y,
    )
}

/// Axis-aligned cube centred on the origin. Faces are wound so their
/// outside faces the viewer.
#[derive(Clone, Debug)]
pub struct Cube {
    points: [FixVec3; 8],
    polygons: [Polygon; 6],
    attributes: [Attribute; 6],
}

impl Cube {
    pub fn new(half_size: i16, attributes: [Attribute; 6]) -> Self {
        let points = core::array::from_fn(|i| {
            let axis = |bit: usize| if i & bit != 0 { half_size } else { -half_size };
            FixVec3::from_int(axis(1), axis(2), axis(4))
        });
        let polygons = CUBE_FACES.map(|[a, b, c, d]| Polygon::new(a, b, c, d));

        Self {
            points,
            polygons,
            attributes,
        }
    }

    /// Cube with texture slots 0 and 1 on the Z faces and flat colours
    /// elsewhere.
    pub fn demo(half_size: i16) -> Self {
        let textured = |slot| {
            Attribute::new(
                Control::new(CommandKind::DistortedSprite),
                DrawMode::new(ColorMode::Rgb),
                Palette::Rgb(0),
            )
            .with_texture(slot)
        };

        Self::new(
            half_size,
            [
                textured(0),
                textured(1),
                Attribute::flat(RED),
                Attribute::flat(GREEN),
                Attribute::flat(BLUE),
                Attribute::flat(YELLOW),
            ],
        )
    }

    pub fn mesh(&self) -> Result<Mesh<'_>, MeshError> {
        Mesh::new(&self.points, &self.polygons, &self.attributes)
    }
}

/// `columns` x `rows` cubes on a plane facing the camera.
#[derive(Clone, Debug)]
pub struct CubeGrid {
    cube: Cube,
    columns: u16,
    rows: u16,
}

impl CubeGrid {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            cube: Cube::demo(CUBE_HALF_SIZE),
            columns,
            rows,
        }
    }

    pub fn cube_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    fn cell_position(&self, column: u16, row: u16) -> FixVec3 {
        let offset = |index: u16, count: u16| {
            (index as i16 * 2 - (count as i16 - 1)).saturating_mul(GRID_SPACING / 2)
        };
        FixVec3::from_int(
            offset(column, self.columns),
            offset(row, self.rows),
            GRID_DEPTH,
        )
    }

    /// Run one pass per cube for `frame`, returning the summed statistics.
    pub fn render<D, I, S, L>(
        &self,
        ctx: &mut RenderContext<D, I, S>,
        frame: u32,
        camera: &Camera,
        lighting: &mut L,
        textures: &TextureList,
    ) -> Result<PassStats, HostError>
    where
        D: DivisionUnit,
        I: InterruptControl,
        S: DepthSort,
        L: Lighting,
    {
        let mesh = self.cube.mesh()?;
        let spin = (frame % 120) as i16 * 3;
        let mut world = MatrixStack::new();
        let mut total = PassStats::default();

        for row in 0..self.rows {
            for column in 0..self.columns {
                world.push()?;
                world.translate(self.cell_position(column, row));
                world.rotate_y(Angle::from_degrees(spin + column as i16 * 30));
                world.rotate_x(Angle::from_degrees(spin / 2 + row as i16 * 20));

                let stats = ctx.render_mesh(&mesh, &world, camera, lighting, textures);
                world.pop()?;
                total += stats?;
            }
        }

        Ok(total)
    }
}
