//! Transient user-facing notices
//!
//! One message at a time; a new one replaces the old. Each `show` hands out
//! a serial so the matching auto-hide only hides the message it belongs to.

/// Current notice shown to the player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_win: bool,
    pub visible: bool,
    serial: u32,
}

impl Message {
    /// Replace the message and make it visible; returns its serial
    pub fn show(&mut self, text: impl Into<String>, is_win: bool) -> u32 {
        self.serial = self.serial.wrapping_add(1);
        self.text = text.into();
        self.is_win = is_win;
        self.visible = true;
        self.serial
    }

    /// Hide the message if it is still the one identified by `serial`
    ///
    /// Returns true if the visible message was hidden.
    pub fn hide(&mut self, serial: u32) -> bool {
        if self.serial != serial || !self.visible {
            return false;
        }
        self.visible = false;
        true
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }
}

fn lines_word(count: u32) -> &'static str {
    if count == 1 { "line" } else { "lines" }
}

/// Text for newly completed lines mid-session
pub fn new_lines_text(new_lines: u32) -> String {
    format!("Bingo! {} new {}!", new_lines, lines_word(new_lines))
}

/// Text for the end of a session
pub fn game_over_text(max_balls: u32, lines: u32) -> String {
    if lines > 0 {
        format!(
            "{}-ball game over! You completed {} {}!",
            max_balls,
            lines,
            lines_word(lines)
        )
    } else {
        format!("{}-ball game over! No lines this time.", max_balls)
    }
}
