//! Per-frame pool of drawable records.

use super::command::DrawCommand;
use super::RenderError;

/// Maximum number of visible polygons per frame.
pub const CMDT_POOL_CAPACITY: usize = 1024;

/// Fixed-capacity record pool, reset once per frame.
///
/// A record's pool index doubles as its link offset from the pool's base
/// slot in the command table.
#[derive(Clone, Debug, Default)]
pub struct CommandPool {
    commands: heapless::Vec<DrawCommand, CMDT_POOL_CAPACITY>,
}

impl CommandPool {
    pub const fn new() -> Self {
        Self {
            commands: heapless::Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Store `command` in the next free slot and return its index.
    pub fn push(&mut self, command: DrawCommand) -> Result<u16, RenderError> {
        let index = self.commands.len() as u16;
        self.commands
            .push(command)
            .map_err(|_| RenderError::PoolExhausted {
                capacity: CMDT_POOL_CAPACITY,
            })?;
        Ok(index)
    }

    /// Drop the most recently stored record.
    pub fn pop(&mut self) -> Option<DrawCommand> {
        self.commands.pop()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn as_slice(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn as_mut_slice(&mut self) -> &mut [DrawCommand] {
        &mut self.commands
    }
}
