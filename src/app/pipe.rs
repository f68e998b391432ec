//! Bounded command pipe between the command surface and the dispatch loop.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌───────────────┐
//! │ uplink / ISR │────▶│  CommandPipe  │────▶│ dispatch loop │
//! │ (producer)   │     │  (bounded)    │     │ (consumer)    │
//! └──────────────┘     └───────────────┘     └───────────────┘
//! ```
//!
//! The radio core runs single-threaded and cooperative: one producer hands
//! commands in, one consumer drains them to completion, one at a time. A
//! full pipe drops the incoming command and counts the drop — the counter
//! is the only way ground can tell commands went missing.

use super::commands::RadioCommand;

/// Pipe depth. One slot is reserved by the queue discipline, so the usable
/// capacity is `CMD_PIPE_DEPTH - 1`.
pub const CMD_PIPE_DEPTH: usize = 16;

/// Fixed-capacity FIFO of pending commands.
pub struct CommandPipe {
    queue: heapless::spsc::Queue<RadioCommand, CMD_PIPE_DEPTH>,
    dropped: u32,
}

impl CommandPipe {
    pub const fn new() -> Self {
        Self {
            queue: heapless::spsc::Queue::new(),
            dropped: 0,
        }
    }

    /// Enqueue a command. Returns `false` (and counts the drop) when the
    /// pipe is full.
    pub fn push(&mut self, cmd: RadioCommand) -> bool {
        match self.queue.enqueue(cmd) {
            Ok(()) => true,
            Err(_) => {
                self.dropped = self.dropped.saturating_add(1);
                false
            }
        }
    }

    /// Dequeue the oldest pending command.
    pub fn pop(&mut self) -> Option<RadioCommand> {
        self.queue.dequeue()
    }

    /// Drain all pending commands into a handler, FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(RadioCommand)) {
        while let Some(cmd) = self.pop() {
            handler(cmd);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Usable capacity of the pipe.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Commands dropped because the pipe was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Default for CommandPipe {
    fn default() -> Self {
        Self::new()
    }
}
