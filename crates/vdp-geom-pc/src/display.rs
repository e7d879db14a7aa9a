//! In-memory command table standing in for display-processor VRAM.
//!
//! Layout:
//!
//! | Slot | Content |
//! |------|---------|
//! | 0    | call site, a subroutine call into the frame's chain |
//! | 1    | end-of-list marker, reached when the chain returns |
//! | 2..  | the frame's drawable records |

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use vdp_geom_core::render::command::DrawCommand;
use vdp_geom_core::render::CMDT_POOL_CAPACITY;
use vdp_geom_core::DisplaySubmit;

use crate::HostError;

pub const CALL_SITE_SLOT: u16 = 0;
pub const END_SLOT: u16 = 1;
/// Slot receiving pool index 0.
pub const POOL_BASE: u16 = 2;
pub const TABLE_SLOTS: usize = POOL_BASE as usize + CMDT_POOL_CAPACITY;

/// Words per 32-byte command slot.
pub const SLOT_WORDS: usize = 16;

/// CTRL word of the end-of-list command.
const END_CODE: u16 = 0x8000;

type Slot = [u16; SLOT_WORDS];

/// Command table with one frame's worth of encoded records.
#[derive(Clone, Debug)]
pub struct CommandTable {
    slots: Vec<Slot>,
    used: usize,
    entry: Option<u16>,
    submissions: u32,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        let mut slots = vec![[0u16; SLOT_WORDS]; TABLE_SLOTS];
        slots[END_SLOT as usize][0] = END_CODE;
        Self {
            slots,
            used: POOL_BASE as usize,
            entry: None,
            submissions: 0,
        }
    }

    /// Forget the previous frame's records.
    pub fn begin_frame(&mut self) {
        self.used = POOL_BASE as usize;
        self.entry = None;
    }

    pub fn set_call_site(&mut self, call_site: &DrawCommand) {
        self.slots[CALL_SITE_SLOT as usize] = call_site.encode();
    }

    /// Slots written this frame, call site and end marker included.
    pub fn used_slots(&self) -> &[Slot] {
        &self.slots[..self.used]
    }

    /// Pool index of the first record in the chain, if anything was
    /// submitted this frame.
    pub fn entry(&self) -> Option<u16> {
        self.entry
    }

    pub fn submissions(&self) -> u32 {
        self.submissions
    }

    /// Write the used slots as little-endian 16-bit words.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for slot in self.used_slots() {
            for word in slot {
                writer.write_all(&word.to_le_bytes())?;
            }
        }
        Ok(())
    }

    pub fn dump(&self, path: &Path) -> Result<(), HostError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;

        log::info!(
            "Wrote {} command slots to {}",
            self.used,
            path.display()
        );
        Ok(())
    }
}

impl DisplaySubmit for CommandTable {
    fn submit(&mut self, commands: &[DrawCommand], pool_base: u16, entry: u16) {
        let start = (pool_base as usize).min(self.slots.len());
        let available = self.slots.len() - start;
        if commands.len() > available {
            log::warn!(
                "command table overflow: {} records, room for {}",
                commands.len(),
                available
            );
        }

        let count = commands.len().min(available);
        for (dst, command) in self.slots[start..].iter_mut().zip(commands) {
            *dst = command.encode();
        }

        self.used = start + count;
        self.entry = Some(entry);
        self.submissions += 1;
    }
}
