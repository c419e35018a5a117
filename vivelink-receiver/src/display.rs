//! vivelink-receiver/src/display.rs
//!
//! Terminal renderer for the three text modes. Each frame clears the screen
//! and redraws the whole block, so the terminal always shows the newest
//! arrival.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::net::SocketAddr;

use colored::{Color, Colorize};

use vivelink_common::{ControllerSnapshot, FrameSnapshot, Hand};

use crate::config::DisplayMode;

/// Full terminal reset.
pub const CLEAR_SCREEN: &str = "\x1bc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Simple,
    Full,
    Raw,
}

impl TextMode {
    pub fn from_display_mode(mode: DisplayMode) -> Option<Self> {
        match mode {
            DisplayMode::Simple => Some(TextMode::Simple),
            DisplayMode::Full => Some(TextMode::Full),
            DisplayMode::Raw => Some(TextMode::Raw),
            DisplayMode::Visualize => None,
        }
    }
}

pub struct TextDisplay {
    mode: TextMode,
    color: bool,
    out: Box<dyn Write + Send>,
}

impl TextDisplay {
    pub fn new(mode: TextMode, color: bool, out: Box<dyn Write + Send>) -> Self {
        Self { mode, color, out }
    }

    pub fn stdout(mode: TextMode, color: bool) -> Self {
        Self::new(mode, color, Box::new(io::stdout()))
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    /// Draw one frame. The whole screen is built first and written in one go.
    pub fn render(&mut self, frame: &FrameSnapshot, payload: &[u8], from: SocketAddr) -> io::Result<()> {
        let text = self.compose(frame, payload, from);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    pub fn compose(&self, frame: &FrameSnapshot, payload: &[u8], from: SocketAddr) -> String {
        let mut s = String::with_capacity(1024);
        s.push_str(CLEAR_SCREEN);
        let _ = writeln!(s, "=== Vive Controller Data ===");
        let _ = writeln!(s, "From: {}", from);
        let _ = writeln!(s, "Time: {}", chrono::Local::now().format("%H:%M:%S"));
        let _ = writeln!(s, "-------------------------------");

        match self.mode {
            TextMode::Simple => {
                for hand in Hand::ALL {
                    self.simple_hand(&mut s, hand, frame.hand(hand));
                }
            }
            TextMode::Full => {
                let _ = writeln!(s, "Timestamp: {:.3}", frame.timestamp);
                for hand in Hand::ALL {
                    self.full_hand(&mut s, hand, frame.hand(hand));
                }
            }
            TextMode::Raw => {
                let _ = writeln!(s, "{}", raw_payload(payload));
            }
        }
        s
    }

    fn simple_hand(&self, s: &mut String, hand: Hand, c: &ControllerSnapshot) {
        let title = hand.wire_name().to_uppercase();
        if !c.tracked {
            let _ = writeln!(s, "\n{} CONTROLLER: {}", title, self.paint("Not tracked", Color::Red));
            return;
        }
        let _ = writeln!(s, "\n{} CONTROLLER:", title);
        self.position_line(s, c);
        self.main_buttons(s, c);
        self.analog(s, c);
    }

    fn full_hand(&self, s: &mut String, hand: Hand, c: &ControllerSnapshot) {
        let title = hand.wire_name().to_uppercase();
        if c.tracked {
            let _ = writeln!(s, "\n{} CONTROLLER:", title);
        } else {
            let _ = writeln!(
                s,
                "\n{} CONTROLLER: {} (last known pose, stale)",
                title,
                self.paint("NOT TRACKED", Color::Red)
            );
        }
        self.position_line(s, c);
        let _ = writeln!(
            s,
            "  Rotation: Roll={:.1}°, Pitch={:.1}°, Yaw={:.1}°",
            c.rotation.roll, c.rotation.pitch, c.rotation.yaw
        );
        self.main_buttons(s, c);
        let _ = writeln!(
            s,
            "    Trackpad touched: {}",
            self.flag(c.buttons.trackpad.touched)
        );
        self.analog(s, c);
        if let Some(raw) = c.raw_buttons {
            let _ = writeln!(s, "\n  RAW BUTTONS:");
            let _ = writeln!(s, "    Pressed: {:#018x}", raw.pressed);
            let _ = writeln!(s, "    Touched: {:#018x}", raw.touched);
        }
    }

    fn position_line(&self, s: &mut String, c: &ControllerSnapshot) {
        let _ = writeln!(
            s,
            "  Position: X={:.4}, Y={:.4}, Z={:.4}",
            c.position.x, c.position.y, c.position.z
        );
    }

    fn main_buttons(&self, s: &mut String, c: &ControllerSnapshot) {
        let b = &c.buttons;
        let _ = writeln!(s, "\n  MAIN BUTTONS:");
        let _ = writeln!(s, "    System: {}", self.flag(b.system));
        let _ = writeln!(s, "    Menu: {}", self.flag(b.menu));
        let _ = writeln!(s, "    Grip: {}", self.flag(b.grip));
        let _ = writeln!(s, "    Trigger: {}", self.flag(b.trigger));
        let trackpad = if b.trackpad.pressed {
            self.paint("PRESSED", Color::Green)
        } else if b.trackpad.touched {
            self.paint("TOUCHED", Color::Yellow)
        } else {
            "---".to_string()
        };
        let _ = writeln!(s, "    Trackpad: {}", trackpad);
    }

    fn analog(&self, s: &mut String, c: &ControllerSnapshot) {
        let a = &c.analog;
        let _ = writeln!(s, "\n  ANALOG INPUTS:");
        let _ = writeln!(s, "    Trigger: {:.2}", a.trigger);
        let _ = writeln!(s, "    Trackpad: X={:.2}, Y={:.2}", a.trackpad.x, a.trackpad.y);
    }

    fn flag(&self, on: bool) -> String {
        if on {
            self.paint("PRESSED", Color::Green)
        } else {
            "---".to_string()
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// The payload as received, pretty-printed when it parses as JSON.
pub fn raw_payload(payload: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(payload) {
        Ok(value) => serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| String::from_utf8_lossy(payload).into_owned()),
        Err(_) => String::from_utf8_lossy(payload).into_owned(),
    }
}
