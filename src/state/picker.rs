//! Picker view model wrapping a [`DigitBuffer`]

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::digit_buffer::{DigitBuffer, InputListener};
use super::saved_state::SavedState;
use crate::error::{PickerError, Result};

/// A logical keypad button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
    Digit(u8),
    Delete,
    /// Long press on delete
    LongDelete,
}

impl Key {
    /// Map a key code to a keypad button, `None` if the picker ignores it
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "del" | "delete" | "backspace" => Some(Self::Delete),
            "long-delete" | "clear" => Some(Self::LongDelete),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c.to_digit(10).map(|d| Self::Digit(d as u8)),
                    _ => None,
                }
            }
        }
    }
}

/// Parse a decimal digit key, rejecting anything outside 0-9
pub fn parse_digit(code: &str) -> Result<u8> {
    let value: u32 = code
        .trim()
        .parse()
        .map_err(|_| PickerError::InvalidKey(code.to_string()))?;
    u8::try_from(value)
        .ok()
        .filter(|&digit| digit <= 9)
        .ok_or(PickerError::InvalidDigit(value))
}

/// Everything a host needs to draw the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerView {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub time_in_millis: u64,
    pub label: String,
    pub has_input: bool,
    pub delete_enabled: bool,
    pub delete_description: String,
}

/// Hours/minutes/seconds picker driven by keypad input
#[derive(Debug, Default)]
pub struct HmsPicker {
    buffer: DigitBuffer,
}

impl HmsPicker {
    pub fn new() -> Self {
        Self {
            buffer: DigitBuffer::new(),
        }
    }

    pub fn buffer(&self) -> &DigitBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut DigitBuffer {
        &mut self.buffer
    }

    pub fn set_listener<L>(&mut self, listener: L)
    where
        L: InputListener + 'static,
    {
        self.buffer.set_listener(listener);
    }

    /// Route a keypad button to the buffer
    pub fn press(&mut self, key: Key) -> Result<()> {
        debug!("Key pressed: {:?}", key);
        match key {
            Key::Digit(digit) => self.buffer.append(digit)?,
            Key::Delete => self.buffer.delete(),
            Key::LongDelete => self.buffer.reset(),
        }
        Ok(())
    }

    /// Formatted duration, e.g. `01h 30m 05s`
    pub fn label(&self) -> String {
        format!(
            "{:02}h {:02}m {:02}s",
            self.buffer.hours(),
            self.buffer.minutes(),
            self.buffer.seconds()
        )
    }

    pub fn delete_enabled(&self) -> bool {
        self.buffer.has_input()
    }

    pub fn divider_activated(&self) -> bool {
        self.buffer.has_input()
    }

    /// Names the digit the next delete would remove
    pub fn delete_description(&self) -> String {
        if self.buffer.has_input() {
            format!("Delete {}", self.buffer.slots()[0])
        } else {
            "Delete".to_string()
        }
    }

    pub fn view(&self) -> PickerView {
        PickerView {
            hours: self.buffer.hours(),
            minutes: self.buffer.minutes(),
            seconds: self.buffer.seconds(),
            time_in_millis: self.buffer.time_in_millis(),
            label: self.label(),
            has_input: self.buffer.has_input(),
            delete_enabled: self.delete_enabled(),
            delete_description: self.delete_description(),
        }
    }

    pub fn save_state(&self) -> SavedState {
        SavedState::capture(self.buffer.time_in_millis())
    }

    /// Restore a snapshot; returns false when it held no time
    pub fn restore_state(&mut self, state: &SavedState) -> bool {
        match state.restorable_millis() {
            Some(millis) => {
                self.buffer.set_time_in_millis(millis);
                debug!("Restored picker to {}", self.label());
                true
            }
            None => false,
        }
    }
}
