//! State management module
//!
//! The digit buffer core, the picker view model on top of it, the persisted
//! snapshot, and the host application state.

pub mod digit_buffer;
pub mod picker;
pub mod saved_state;
pub mod app_state;

// Re-export main types
pub use digit_buffer::{BufferState, DigitBuffer, InputListener};
pub use picker::{parse_digit, HmsPicker, Key, PickerView};
pub use saved_state::SavedState;
pub use app_state::{AppState, BroadcastListener, InputChange, TimeUpdate};
