//! Texture table lookup by slot.

/// Maximum number of entries in a [`TextureList`].
pub const TEXTURE_LIST_CAPACITY: usize = 64;

/// Texture location as the command table expects it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Texture {
    /// VRAM address in 8-byte units (SRCA).
    pub vram_offset: u16,
    /// Packed size word (SIZE).
    pub size: u16,
}

impl Texture {
    /// Describe a `width` x `height` texture at byte address `vram_address`.
    /// `width` is rounded down to a multiple of 8.
    pub const fn new(vram_address: u32, width: u16, height: u16) -> Self {
        Self {
            vram_offset: (vram_address >> 3) as u16,
            size: (((width >> 3) & 0x3F) << 8) | (height & 0xFF),
        }
    }
}

/// Trait for resolving a polygon's texture slot.
pub trait TextureLookup {
    fn get_by_slot(&self, slot: u16) -> Option<Texture>;
}

/// Fixed-capacity texture table indexed by slot number.
#[derive(Clone, Debug, Default)]
pub struct TextureList {
    textures: heapless::Vec<Texture, TEXTURE_LIST_CAPACITY>,
}

impl TextureList {
    pub const fn new() -> Self {
        Self {
            textures: heapless::Vec::new(),
        }
    }

    /// Append a texture, returning its slot, or the texture back if the
    /// table is full.
    pub fn push(&mut self, texture: Texture) -> Result<u16, Texture> {
        let slot = self.textures.len() as u16;
        self.textures.push(texture)?;
        Ok(slot)
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureLookup for TextureList {
    fn get_by_slot(&self, slot: u16) -> Option<Texture> {
        self.textures.get(slot as usize).copied()
    }
}
