//! HMS Picker - keypad entry of hours, minutes and seconds
//!
//! The core is [`DigitBuffer`], a six-digit shift register that turns keypad
//! input into a duration and reports when it gains or loses input. The
//! remaining modules host one picker behind a small HTTP keypad API.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PickerError, Result};
pub use state::{AppState, DigitBuffer, HmsPicker, InputListener, Key, PickerView, SavedState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
