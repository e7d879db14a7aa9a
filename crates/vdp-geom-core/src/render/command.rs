//! Drawable primitive records and their command-table encoding.
//!
//! One record encodes to 16 half-words (one 32-byte command table slot):
//!
//! | Word  | Name  | Content |
//! |-------|-------|---------|
//! | 0     | CTRL  | bits 14-12 [`LinkType`], bits 5-0 [`Control`] |
//! | 1     | LINK  | target slot in 8-byte units (`slot * 4`) |
//! | 2     | PMOD  | [`DrawMode`] |
//! | 3     | COLR  | [`Palette`](super::mesh::Palette) word |
//! | 4     | SRCA  | texture address in 8-byte units |
//! | 5     | SIZE  | texture width / 8 in bits 13-8, height in bits 7-0 |
//! | 6-13  | XA-YD | corners A..D, x then y |
//! | 14    | GRDA  | gouraud table slot |
//! | 15    | -     | zero |

use super::mesh::{Attribute, Control, DrawMode};
use super::polygon::PolygonState;
use super::texture::Texture;
use crate::math::ScreenPoint;

/// How the display processor finds the next command after this one.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkType {
    /// Continue with the following slot.
    #[default]
    JumpNext = 0,
    /// Continue at `link`.
    JumpAssign = 1,
    /// Call the chain at `link`, resuming after this slot on return.
    JumpCall = 2,
    /// Return from the current call.
    JumpReturn = 3,
    SkipNext = 4,
    SkipAssign = 5,
    SkipCall = 6,
    SkipReturn = 7,
}

/// One polygon command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawCommand {
    pub link_type: LinkType,
    /// Absolute command-table slot this record links to.
    pub link: u16,
    pub control: Control,
    pub draw_mode: DrawMode,
    pub color: u16,
    pub texture: Texture,
    pub vertices: [ScreenPoint; 4],
    pub gouraud: u16,
}

impl DrawCommand {
    /// Build the record for a visible polygon from its working state.
    ///
    /// `texture` must already be resolved from `attribute.texture_slot`.
    pub fn assemble(polygon: &PolygonState, attribute: &Attribute, texture: Option<Texture>) -> Self {
        Self {
            link_type: LinkType::JumpAssign,
            link: 0,
            control: polygon.control,
            draw_mode: polygon.draw_mode,
            color: attribute.palette.raw(),
            texture: texture.unwrap_or_default(),
            vertices: polygon.screen_points,
            gouraud: polygon.shading_slot,
        }
    }

    pub fn encode(&self) -> [u16; 16] {
        let mut words = [0u16; 16];
        words[0] = ((self.link_type as u16) << 12) | self.control.raw();
        words[1] = self.link.wrapping_mul(4);
        words[2] = self.draw_mode.raw();
        words[3] = self.color;
        words[4] = self.texture.vram_offset;
        words[5] = self.texture.size;
        for (i, v) in self.vertices.iter().enumerate() {
            words[6 + i * 2] = v.x as u16;
            words[7 + i * 2] = v.y as u16;
        }
        words[14] = self.gouraud;
        words
    }
}
