//! Game logic
//!
//! Board generation, line detection, messages and the timer schedule are
//! pure and deterministic:
//! - Seeded RNG only
//! - Virtual clock only (no wall-clock timers)
//! - No rendering or platform dependencies
//!
//! `GameController` ties them to the physics and rendering boundaries.

pub mod board;
pub mod controller;
pub mod lines;
pub mod message;
pub mod schedule;
pub mod state;

pub use board::{BOARD_SIZE, Board, CELL_COUNT, DrawnSet, NUMBER_MAX};
pub use controller::GameController;
pub use lines::{Line, completed_lines, count_lines};
pub use message::Message;
pub use schedule::Schedule;
pub use state::{GameEvent, GameState, SessionPhase};
