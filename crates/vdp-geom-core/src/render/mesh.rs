//! Quad meshes and per-polygon draw attributes.
//!
//! A [`Mesh`] borrows caller-owned data for the length of a pass. It can
//! only be built through [`Mesh::new`], which validates every index and
//! attribute up front so the pipeline never sees malformed input.

use crate::math::FixVec3;

/// Four point indices, wound A-B-C-D.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Polygon {
    pub indices: [u16; 4],
}

impl Polygon {
    pub const fn new(p0: u16, p1: u16, p2: u16, p3: u16) -> Self {
        Self {
            indices: [p0, p1, p2, p3],
        }
    }
}

/// Which corner depths represent the polygon in the depth sort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortType {
    /// Average of corners 0 and 2.
    #[default]
    Center,
    Min,
    Max,
}

/// Whether backface culling applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaneType {
    #[default]
    Single,
    Double,
}

/// Hardware command selected by the low nibble of the control word.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    NormalSprite = 0,
    ScaledSprite = 1,
    DistortedSprite = 2,
    Polygon = 4,
    Polyline = 5,
    Line = 6,
}

impl CommandKind {
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(Self::NormalSprite),
            1 => Some(Self::ScaledSprite),
            2 => Some(Self::DistortedSprite),
            4 => Some(Self::Polygon),
            5 => Some(Self::Polyline),
            6 => Some(Self::Line),
            _ => None,
        }
    }
}

/// Command control bits copied into the record's CTRL word.
///
/// | Bits | Field |
/// |------|-------|
/// | 5    | vertical flip |
/// | 4    | horizontal flip |
/// | 3-0  | [`CommandKind`] |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Control(u16);

impl Control {
    pub const FLIP_H: u16 = 1 << 4;
    pub const FLIP_V: u16 = 1 << 5;

    const KIND_MASK: u16 = 0x000F;
    const MASK: u16 = 0x003F;

    pub const fn new(kind: CommandKind) -> Self {
        Self(kind as u16)
    }

    /// Build from a raw word. Bits outside the control field are dropped.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw & Self::MASK)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn kind(self) -> Option<CommandKind> {
        CommandKind::from_bits(self.0 & Self::KIND_MASK)
    }

    pub const fn with(self, bits: u16) -> Self {
        Self((self.0 | bits) & Self::MASK)
    }

    pub const fn contains(self, bits: u16) -> bool {
        self.0 & bits == bits
    }

    pub fn toggle(&mut self, bits: u16) {
        self.0 ^= bits & Self::MASK;
    }

    pub const fn flip_h(self) -> bool {
        self.contains(Self::FLIP_H)
    }

    pub const fn flip_v(self) -> bool {
        self.contains(Self::FLIP_V)
    }
}

impl Default for Control {
    fn default() -> Self {
        Self::new(CommandKind::Polygon)
    }
}

/// Pixel colour mode, bits 5-3 of the draw mode word.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Bank16 = 0,
    Lookup16 = 1,
    Bank64 = 2,
    Bank128 = 3,
    Bank256 = 4,
    Rgb = 5,
}

impl ColorMode {
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(Self::Bank16),
            1 => Some(Self::Lookup16),
            2 => Some(Self::Bank64),
            3 => Some(Self::Bank128),
            4 => Some(Self::Bank256),
            5 => Some(Self::Rgb),
            _ => None,
        }
    }
}

/// Draw mode word (PMOD).
///
/// | Bits  | Field |
/// |-------|-------|
/// | 15    | MSB on |
/// | 12    | high-speed shrink |
/// | 11    | pre-clipping disable |
/// | 10-9  | user clipping |
/// | 8     | mesh |
/// | 7     | end-code disable |
/// | 6     | transparent-pixel disable |
/// | 5-3   | [`ColorMode`] |
/// | 2-0   | colour calculation |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawMode(u16);

impl DrawMode {
    pub const MSB_ON: u16 = 1 << 15;
    pub const HIGH_SPEED_SHRINK: u16 = 1 << 12;
    pub const PRE_CLIPPING_DISABLE: u16 = 1 << 11;
    pub const MESH: u16 = 1 << 8;
    pub const END_CODE_DISABLE: u16 = 1 << 7;
    pub const TRANSPARENT_PIXEL_DISABLE: u16 = 1 << 6;

    const COLOR_MODE_SHIFT: u16 = 3;
    const COLOR_MODE_MASK: u16 = 0x7 << Self::COLOR_MODE_SHIFT;
    const COLOR_CALC_MASK: u16 = 0x7;

    pub const fn new(mode: ColorMode) -> Self {
        Self((mode as u16) << Self::COLOR_MODE_SHIFT)
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn with(self, bits: u16) -> Self {
        Self(self.0 | bits)
    }

    pub const fn contains(self, bits: u16) -> bool {
        self.0 & bits == bits
    }

    pub fn set(&mut self, bits: u16, on: bool) {
        if on {
            self.0 |= bits;
        } else {
            self.0 &= !bits;
        }
    }

    pub const fn color_mode(self) -> Option<ColorMode> {
        ColorMode::from_bits((self.0 & Self::COLOR_MODE_MASK) >> Self::COLOR_MODE_SHIFT)
    }

    pub const fn color_calc(self) -> u16 {
        self.0 & Self::COLOR_CALC_MASK
    }

    pub const fn with_color_calc(self, calc: u16) -> Self {
        Self((self.0 & !Self::COLOR_CALC_MASK) | (calc & Self::COLOR_CALC_MASK))
    }
}

/// Colour word (COLR). The valid variant depends on the draw mode's
/// colour mode: `Rgb` for [`ColorMode::Rgb`], `Lookup` for
/// [`ColorMode::Lookup16`], `Bank` for every bank mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    /// RGB1555 colour for untextured polygons.
    Rgb(u16),
    /// Colour bank number.
    Bank(u16),
    /// Lookup-table address in 8-byte units.
    Lookup(u16),
}

impl Palette {
    pub const fn raw(self) -> u16 {
        match self {
            Palette::Rgb(v) | Palette::Bank(v) | Palette::Lookup(v) => v,
        }
    }

    pub const fn matches(self, mode: ColorMode) -> bool {
        matches!(
            (self, mode),
            (Palette::Rgb(_), ColorMode::Rgb)
                | (Palette::Lookup(_), ColorMode::Lookup16)
                | (
                    Palette::Bank(_),
                    ColorMode::Bank16 | ColorMode::Bank64 | ColorMode::Bank128 | ColorMode::Bank256
                )
        )
    }
}

/// Per-polygon draw attributes. Never modified by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub control: Control,
    pub plane: PlaneType,
    pub sort: SortType,
    /// `Some(slot)` marks a textured polygon.
    pub texture_slot: Option<u16>,
    pub draw_mode: DrawMode,
    pub palette: Palette,
    pub shading_slot: u16,
}

impl Attribute {
    /// Untextured, single-sided, centre-sorted attribute.
    pub const fn new(control: Control, draw_mode: DrawMode, palette: Palette) -> Self {
        Self {
            control,
            plane: PlaneType::Single,
            sort: SortType::Center,
            texture_slot: None,
            draw_mode,
            palette,
            shading_slot: 0,
        }
    }

    /// Flat RGB polygon.
    pub const fn flat(color: u16) -> Self {
        Self::new(
            Control::new(CommandKind::Polygon),
            DrawMode::new(ColorMode::Rgb),
            Palette::Rgb(color),
        )
    }

    pub const fn with_plane(mut self, plane: PlaneType) -> Self {
        self.plane = plane;
        self
    }

    pub const fn with_sort(mut self, sort: SortType) -> Self {
        self.sort = sort;
        self
    }

    pub const fn with_texture(mut self, slot: u16) -> Self {
        self.texture_slot = Some(slot);
        self
    }

    pub const fn with_shading_slot(mut self, slot: u16) -> Self {
        self.shading_slot = slot;
        self
    }
}

/// Reasons a mesh is rejected by [`Mesh::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// A polygon references a point past the end of the point list.
    IndexOutOfRange {
        polygon: usize,
        index: u16,
        points: usize,
    },
    /// Every polygon needs exactly one attribute.
    AttributeCountMismatch { polygons: usize, attributes: usize },
    /// The palette variant does not fit the draw mode's colour mode.
    PaletteMismatch { polygon: usize },
}

impl core::fmt::Display for MeshError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MeshError::IndexOutOfRange {
                polygon,
                index,
                points,
            } => write!(
                f,
                "polygon {polygon} references point {index} but the mesh has {points} points"
            ),
            MeshError::AttributeCountMismatch {
                polygons,
                attributes,
            } => write!(f, "{polygons} polygons but {attributes} attributes"),
            MeshError::PaletteMismatch { polygon } => {
                write!(f, "polygon {polygon} palette does not match its colour mode")
            }
        }
    }
}

impl core::error::Error for MeshError {}

/// Validated, borrowed quad mesh.
#[derive(Clone, Copy, Debug)]
pub struct Mesh<'a> {
    points: &'a [FixVec3],
    polygons: &'a [Polygon],
    attributes: &'a [Attribute],
}

impl<'a> Mesh<'a> {
    pub fn new(
        points: &'a [FixVec3],
        polygons: &'a [Polygon],
        attributes: &'a [Attribute],
    ) -> Result<Self, MeshError> {
        if polygons.len() != attributes.len() {
            return Err(MeshError::AttributeCountMismatch {
                polygons: polygons.len(),
                attributes: attributes.len(),
            });
        }

        for (i, (polygon, attribute)) in polygons.iter().zip(attributes).enumerate() {
            if let Some(&index) = polygon
                .indices
                .iter()
                .find(|&&index| index as usize >= points.len())
            {
                return Err(MeshError::IndexOutOfRange {
                    polygon: i,
                    index,
                    points: points.len(),
                });
            }

            let palette_ok = attribute
                .draw_mode
                .color_mode()
                .is_some_and(|mode| attribute.palette.matches(mode));
            if !palette_ok {
                return Err(MeshError::PaletteMismatch { polygon: i });
            }
        }

        Ok(Self {
            points,
            polygons,
            attributes,
        })
    }

    pub fn points(&self) -> &'a [FixVec3] {
        self.points
    }

    pub fn polygons(&self) -> &'a [Polygon] {
        self.polygons
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        self.attributes
    }
}
