//! Host application state around a single picker

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{DigitBuffer, HmsPicker, InputListener, Key, PickerView, SavedState};
use crate::error::{PickerError, Result};

/// Emptiness edge forwarded from the picker's listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputChange {
    HasInput,
    NoInput,
}

/// Listener that forwards picker edges onto a broadcast channel
pub struct BroadcastListener {
    tx: broadcast::Sender<InputChange>,
}

impl BroadcastListener {
    pub fn new(tx: broadcast::Sender<InputChange>) -> Self {
        Self { tx }
    }

    fn send(&self, change: InputChange) {
        // No subscribers yet is fine
        if self.tx.send(change).is_err() {
            debug!("No subscribers for input change {:?}", change);
        }
    }
}

impl InputListener for BroadcastListener {
    fn on_became_non_empty(&mut self, _buffer: &mut DigitBuffer) {
        self.send(InputChange::HasInput);
    }

    fn on_became_empty(&mut self, _buffer: &mut DigitBuffer) {
        self.send(InputChange::NoInput);
    }
}

/// Fields accepted by a time update, applied hours, minutes, then seconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeUpdate {
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
    /// Takes precedence over the individual fields
    pub millis: Option<u64>,
}

/// Main application state hosting one picker
#[derive(Debug)]
pub struct AppState {
    /// The picker; the lock serializes input events
    pub picker: Arc<Mutex<HmsPicker>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Emptiness edges from the picker
    pub input_change_tx: broadcast::Sender<InputChange>,
    /// Whether the picker holds input the host may accept
    pub ready_tx: watch::Sender<bool>,
    /// Keep the receiver alive to prevent channel closure
    pub _ready_rx: watch::Receiver<bool>,
    /// Flipped once to stop background tasks
    pub shutdown_tx: watch::Sender<bool>,
}

impl AppState {
    /// Create a new AppState with an empty picker
    pub fn new(port: u16, host: String) -> Self {
        let (input_change_tx, _) = broadcast::channel(100);
        let (ready_tx, ready_rx) = watch::channel(false);
        let (shutdown_tx, _) = watch::channel(false);

        let mut picker = HmsPicker::new();
        picker.set_listener(BroadcastListener::new(input_change_tx.clone()));

        Self {
            picker: Arc::new(Mutex::new(picker)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            input_change_tx,
            ready_tx,
            _ready_rx: ready_rx,
            shutdown_tx,
        }
    }

    /// Ask background tasks to stop
    pub fn shutdown(&self) {
        info!("Stopping background tasks");
        self.shutdown_tx.send_replace(true);
    }

    fn lock_picker(&self) -> Result<MutexGuard<'_, HmsPicker>> {
        self.picker
            .lock()
            .map_err(|e| PickerError::StatePoisoned(e.to_string()))
    }

    /// Apply an input event to the picker and record it as the last action
    pub fn update_picker<F>(&self, action: &str, updater: F) -> Result<PickerView>
    where
        F: FnOnce(&mut HmsPicker) -> Result<()>,
    {
        let mut picker = self.lock_picker()?;
        updater(&mut *picker)?;
        let view = picker.view();
        drop(picker); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(view)
    }

    pub fn append(&self, digit: u8) -> Result<PickerView> {
        self.update_picker(&format!("digit {}", digit), |picker| picker.press(Key::Digit(digit)))
    }

    pub fn delete(&self) -> Result<PickerView> {
        self.update_picker("delete", |picker| picker.press(Key::Delete))
    }

    pub fn reset(&self) -> Result<PickerView> {
        info!("Resetting picker");
        self.update_picker("reset", |picker| picker.press(Key::LongDelete))
    }

    pub fn press(&self, key: Key) -> Result<PickerView> {
        self.update_picker(&format!("key {:?}", key), |picker| picker.press(key))
    }

    pub fn set_time(&self, update: &TimeUpdate) -> Result<PickerView> {
        self.update_picker("set-time", |picker| {
            let buffer = picker.buffer_mut();
            if let Some(millis) = update.millis {
                buffer.set_time_in_millis(millis);
                return Ok(());
            }
            if let Some(hours) = update.hours {
                buffer.set_hours(hours);
            }
            if let Some(minutes) = update.minutes {
                buffer.set_minutes(minutes);
            }
            if let Some(seconds) = update.seconds {
                buffer.set_seconds(seconds);
            }
            Ok(())
        })
    }

    /// Get current picker view
    pub fn get_view(&self) -> Result<PickerView> {
        Ok(self.lock_picker()?.view())
    }

    pub fn is_ready(&self) -> bool {
        *self.ready_tx.borrow()
    }

    pub fn save_state(&self) -> Result<SavedState> {
        Ok(self.lock_picker()?.save_state())
    }

    pub fn restore_state(&self, state: &SavedState) -> Result<bool> {
        let restored = self.lock_picker()?.restore_state(state);
        if !restored {
            warn!("Snapshot held no time, keeping an empty picker");
        }
        Ok(restored)
    }

    /// Restore from a snapshot file written by [`SavedState::store`]
    pub fn restore_from_file(&self, path: &Path) -> Result<bool> {
        let snapshot = SavedState::load(path)?;
        self.restore_state(&snapshot)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
