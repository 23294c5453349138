//! Session state and events
//!
//! Plain owned state; the UI polls `GameEvent`s instead of relying on a
//! reactive binding.

use super::board::{Board, DrawnSet};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Board shown, no draws running
    Idle,
    /// Draw ticks are proceeding
    Running,
    /// `max_balls` reached and the terminal message shown
    Ended,
}

/// Things the UI may want to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A new board was generated
    BoardChanged,
    /// A session started (drawn set cleared, physics rebuilt)
    SessionStarted,
    /// A ball entered play
    NumberDrawn { number: u8, on_board: bool },
    /// The completed-line count went up
    LinesCompleted { total: u32, new: u32 },
    MessageShown { text: String, is_win: bool },
    MessageHidden,
    /// Terminal state reached
    SessionEnded { lines: u32 },
}

/// Everything the controller tracks about the current board and session
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub drawn: DrawnSet,
    /// Numbers picked for a batch but not yet introduced
    pub pending: Vec<u8>,
    pub max_balls: u32,
    /// Line count as of the last win check
    pub winning_lines: u32,
    /// Guards the terminal message so it is shown once per session
    pub end_message_shown: bool,
    pub phase: SessionPhase,
    /// Bumped on every session start or board reset; scheduled actions
    /// carrying an older value are stale
    pub generation: u32,
}

impl GameState {
    pub fn new(board: Board, max_balls: u32) -> Self {
        Self {
            board,
            drawn: DrawnSet::new(),
            pending: Vec::new(),
            max_balls,
            winning_lines: 0,
            end_message_shown: false,
            phase: SessionPhase::Idle,
            generation: 0,
        }
    }

    /// Clear per-session progress and invalidate scheduled actions
    pub fn reset_progress(&mut self) {
        self.drawn.clear();
        self.pending.clear();
        self.winning_lines = 0;
        self.end_message_shown = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Balls still allowed this session, counting reserved ones
    pub fn remaining_capacity(&self) -> usize {
        (self.max_balls as usize).saturating_sub(self.drawn.len() + self.pending.len())
    }

    pub fn is_exhausted(&self) -> bool {
        self.drawn.len() >= self.max_balls as usize
    }

    /// Numbers neither drawn nor reserved
    pub fn available_numbers(&self) -> Vec<u8> {
        self.drawn
            .remaining()
            .into_iter()
            .filter(|n| !self.pending.contains(n))
            .collect()
    }
}
