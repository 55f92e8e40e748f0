//! Fixed-width digit buffer behind the picker keypad
//!
//! Digits are shifted in from slot 0, so the buffer always reads as
//! `[sec units, sec tens, min units, min tens, hour units, hour tens]`.

use std::fmt;

use tracing::{debug, trace};

use crate::error::{PickerError, Result};

/// Number of digit slots (HHMMSS)
pub const CAPACITY: usize = 6;

pub const SECOND_IN_MILLIS: u64 = 1_000;
pub const MINUTE_IN_MILLIS: u64 = 60 * SECOND_IN_MILLIS;
pub const HOUR_IN_MILLIS: u64 = 60 * MINUTE_IN_MILLIS;

/// Observer for the "has any input" edge of a [`DigitBuffer`]
///
/// Callbacks run synchronously inside the mutating call and may mutate the
/// buffer they are handed.
pub trait InputListener: Send {
    /// The buffer went from empty to holding at least one digit
    fn on_became_non_empty(&mut self, buffer: &mut DigitBuffer);

    /// The buffer went back to 00h 00m 00s with no digits held
    fn on_became_empty(&mut self, buffer: &mut DigitBuffer);
}

/// Entry state of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Empty,
    /// Cursor position; `n + 1` digits are held
    Filled(usize),
}

pub struct DigitBuffer {
    slots: [u8; CAPACITY],
    /// Index of the most significant occupied slot
    cursor: Option<usize>,
    listener: Option<Box<dyn InputListener>>,
    /// Set when the listener is replaced or cleared
    listener_changed: bool,
}

impl DigitBuffer {
    /// Create an empty buffer (00h 00m 00s)
    pub fn new() -> Self {
        Self {
            slots: [0; CAPACITY],
            cursor: None,
            listener: None,
            listener_changed: false,
        }
    }

    /// Register the single listener, replacing any previous one
    pub fn set_listener<L>(&mut self, listener: L)
    where
        L: InputListener + 'static,
    {
        self.listener = Some(Box::new(listener));
        self.listener_changed = true;
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
        self.listener_changed = true;
    }

    pub fn slots(&self) -> [u8; CAPACITY] {
        self.slots
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn state(&self) -> BufferState {
        match self.cursor {
            None => BufferState::Empty,
            Some(cursor) => BufferState::Filled(cursor),
        }
    }

    /// True once any digit has been keyed in, regardless of its value
    pub fn has_input(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_input()
    }

    /// Shift a digit in at the seconds-units end
    ///
    /// A leading zero and any digit past the sixth are dropped.
    pub fn append(&mut self, digit: u8) -> Result<()> {
        if digit > 9 {
            return Err(PickerError::InvalidDigit(u32::from(digit)));
        }

        let occupied = match self.cursor {
            None if digit == 0 => {
                trace!("Ignoring leading zero");
                return Ok(());
            }
            Some(cursor) if cursor == CAPACITY - 1 => {
                trace!("Buffer full, ignoring digit {}", digit);
                return Ok(());
            }
            None => 0,
            Some(cursor) => cursor + 1,
        };

        let was_empty = self.is_empty();
        self.slots.copy_within(0..occupied, 1);
        self.slots[0] = digit;
        self.cursor = Some(occupied);
        trace!("Appended {}, slots={:?}", digit, self.slots);

        self.dispatch(was_empty);
        Ok(())
    }

    /// Drop the most recently entered digit
    pub fn delete(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };

        self.slots.copy_within(1..=cursor, 0);
        self.slots[cursor] = 0;
        self.cursor = cursor.checked_sub(1);
        trace!("Deleted digit, slots={:?}", self.slots);

        self.dispatch(false);
    }

    /// Clear back to 00h 00m 00s
    pub fn reset(&mut self) {
        if self.cursor.is_none() {
            return;
        }

        self.slots = [0; CAPACITY];
        self.cursor = None;
        debug!("Buffer reset");

        self.dispatch(false);
    }

    pub fn seconds(&self) -> u32 {
        self.field(0)
    }

    pub fn minutes(&self) -> u32 {
        self.field(2)
    }

    pub fn hours(&self) -> u32 {
        self.field(4)
    }

    /// 0 up to 99h 99m 99s in milliseconds
    pub fn time_in_millis(&self) -> u64 {
        u64::from(self.seconds()) * SECOND_IN_MILLIS
            + u64::from(self.minutes()) * MINUTE_IN_MILLIS
            + u64::from(self.hours()) * HOUR_IN_MILLIS
    }

    /// Rebuild the slots from a millisecond value
    ///
    /// Each field keeps only its last two decimal digits, so 150 hours reads
    /// back as 50. Sub-second remainders are dropped.
    pub fn load_from_millis(&mut self, total_millis: u64) {
        let was_empty = self.is_empty();

        let hours = total_millis / HOUR_IN_MILLIS;
        let remaining = total_millis % HOUR_IN_MILLIS;
        let minutes = remaining / MINUTE_IN_MILLIS;
        let remaining = remaining % MINUTE_IN_MILLIS;
        let seconds = remaining / SECOND_IN_MILLIS;

        self.slots = [
            units(seconds),
            tens(seconds),
            units(minutes),
            tens(minutes),
            units(hours),
            tens(hours),
        ];
        self.cursor = self.slots.iter().rposition(|&digit| digit != 0);
        debug!(
            "Loaded {}ms as {:02}h {:02}m {:02}s",
            total_millis,
            self.hours(),
            self.minutes(),
            self.seconds()
        );

        self.dispatch(was_empty);
    }

    pub fn set_time_in_millis(&mut self, time: u64) {
        self.load_from_millis(time);
    }

    /// Set hours, keeping minutes and seconds
    pub fn set_hours(&mut self, hours: u32) {
        self.load_from_millis(compose(hours, self.minutes(), self.seconds()));
    }

    /// Set minutes, keeping hours and seconds
    pub fn set_minutes(&mut self, minutes: u32) {
        self.load_from_millis(compose(self.hours(), minutes, self.seconds()));
    }

    /// Set seconds, keeping hours and minutes
    pub fn set_seconds(&mut self, seconds: u32) {
        self.load_from_millis(compose(self.hours(), self.minutes(), seconds));
    }

    fn field(&self, units_slot: usize) -> u32 {
        u32::from(self.slots[units_slot + 1]) * 10 + u32::from(self.slots[units_slot])
    }

    /// Deliver emptiness edges relative to `was_empty`
    ///
    /// The listener is detached while it runs. If it flips the emptiness
    /// again, the follow-up edge is delivered once it returns. A listener
    /// that replaces or clears itself from its callback is not put back.
    fn dispatch(&mut self, was_empty: bool) {
        let mut delivered_empty = was_empty;

        loop {
            let now_empty = self.is_empty();
            if now_empty == delivered_empty {
                return;
            }
            let Some(mut listener) = self.listener.take() else {
                return;
            };
            self.listener_changed = false;

            if now_empty {
                debug!("Buffer has no input");
                listener.on_became_empty(self);
            } else {
                debug!("Buffer has input");
                listener.on_became_non_empty(self);
            }

            if !self.listener_changed {
                self.listener = Some(listener);
            }
            delivered_empty = now_empty;
        }
    }
}

impl Default for DigitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DigitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitBuffer")
            .field("slots", &self.slots)
            .field("cursor", &self.cursor)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

fn units(value: u64) -> u8 {
    (value % 10) as u8
}

fn tens(value: u64) -> u8 {
    (value / 10 % 10) as u8
}

fn compose(hours: u32, minutes: u32, seconds: u32) -> u64 {
    u64::from(seconds) * SECOND_IN_MILLIS
        + u64::from(minutes) * MINUTE_IN_MILLIS
        + u64::from(hours) * HOUR_IN_MILLIS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Edge {
        NonEmpty,
        Empty,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        edges: Arc<Mutex<Vec<Edge>>>,
    }

    impl Recorder {
        fn edges(&self) -> Vec<Edge> {
            self.edges.lock().unwrap().clone()
        }
    }

    impl InputListener for Recorder {
        fn on_became_non_empty(&mut self, _buffer: &mut DigitBuffer) {
            self.edges.lock().unwrap().push(Edge::NonEmpty);
        }

        fn on_became_empty(&mut self, _buffer: &mut DigitBuffer) {
            self.edges.lock().unwrap().push(Edge::Empty);
        }
    }

    fn recorded() -> (DigitBuffer, Recorder) {
        let recorder = Recorder::default();
        let mut buffer = DigitBuffer::new();
        buffer.set_listener(recorder.clone());
        (buffer, recorder)
    }

    fn typed(digits: &[u8]) -> DigitBuffer {
        let mut buffer = DigitBuffer::new();
        for &digit in digits {
            buffer.append(digit).unwrap();
        }
        buffer
    }

    #[test]
    fn test_append_shifts_digits() {
        let buffer = typed(&[9, 3, 0]);
        assert_eq!(buffer.slots(), [0, 3, 9, 0, 0, 0]);
        assert_eq!(buffer.cursor(), Some(2));
        assert_eq!(buffer.seconds(), 30);
        assert_eq!(buffer.minutes(), 9);
        assert_eq!(buffer.hours(), 0);
    }

    #[test]
    fn test_append_reads_as_hhmmss() {
        let cases: &[(&[u8], u64)] = &[
            (&[5], 5 * SECOND_IN_MILLIS),
            (&[1, 2, 3], 1 * MINUTE_IN_MILLIS + 23 * SECOND_IN_MILLIS),
            (
                &[1, 2, 3, 4, 5, 6],
                12 * HOUR_IN_MILLIS + 34 * MINUTE_IN_MILLIS + 56 * SECOND_IN_MILLIS,
            ),
            (
                &[9, 9, 9, 9, 9, 9],
                99 * HOUR_IN_MILLIS + 99 * MINUTE_IN_MILLIS + 99 * SECOND_IN_MILLIS,
            ),
            (&[1, 0, 0, 0, 0], 1 * HOUR_IN_MILLIS),
        ];
        for (digits, expected) in cases {
            assert_eq!(typed(digits).time_in_millis(), *expected, "digits {:?}", digits);
        }
    }

    #[test]
    fn test_leading_zero_is_ignored() {
        let (mut buffer, recorder) = recorded();
        buffer.append(0).unwrap();
        assert_eq!(buffer.state(), BufferState::Empty);
        assert!(recorder.edges().is_empty());

        buffer.append(4).unwrap();
        buffer.append(0).unwrap();
        assert_eq!(buffer.seconds(), 40);
    }

    #[test]
    fn test_seventh_digit_is_dropped() {
        let mut buffer = typed(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(buffer.state(), BufferState::Filled(5));
        let before = buffer.slots();

        buffer.append(5).unwrap();
        assert_eq!(buffer.slots(), before);
        assert_eq!(buffer.state(), BufferState::Filled(5));
    }

    #[test]
    fn test_invalid_digit() {
        let mut buffer = typed(&[7]);
        assert_eq!(buffer.append(10), Err(PickerError::InvalidDigit(10)));
        assert_eq!(buffer.slots(), [7, 0, 0, 0, 0, 0]);
        assert_eq!(buffer.cursor(), Some(0));
    }

    #[test]
    fn test_append_then_delete_restores_state() {
        for digits in [&[][..], &[3][..], &[1, 2][..], &[4, 0, 0, 2, 1][..]] {
            let mut buffer = typed(digits);
            let (slots, cursor) = (buffer.slots(), buffer.cursor());
            buffer.append(8).unwrap();
            buffer.delete();
            assert_eq!(buffer.slots(), slots);
            assert_eq!(buffer.cursor(), cursor);
        }
    }

    #[test]
    fn test_delete_shifts_back() {
        let mut buffer = typed(&[1, 2, 3]);
        buffer.delete();
        assert_eq!(buffer.slots(), [2, 1, 0, 0, 0, 0]);
        assert_eq!(buffer.state(), BufferState::Filled(1));
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let (mut buffer, recorder) = recorded();
        buffer.delete();
        assert_eq!(buffer.state(), BufferState::Empty);
        assert!(recorder.edges().is_empty());
    }

    #[test]
    fn test_reset() {
        let (mut buffer, recorder) = recorded();
        buffer.reset();
        assert!(recorder.edges().is_empty());

        buffer.append(4).unwrap();
        buffer.append(2).unwrap();
        buffer.reset();
        assert_eq!(buffer.slots(), [0; CAPACITY]);
        assert_eq!(buffer.cursor(), None);
        assert_eq!(recorder.edges(), vec![Edge::NonEmpty, Edge::Empty]);
    }

    #[test]
    fn test_edges_fire_only_on_transitions() {
        let (mut buffer, recorder) = recorded();
        buffer.append(1).unwrap();
        buffer.append(2).unwrap();
        buffer.append(3).unwrap();
        buffer.delete();
        buffer.delete();
        assert_eq!(recorder.edges(), vec![Edge::NonEmpty]);

        buffer.delete();
        assert_eq!(recorder.edges(), vec![Edge::NonEmpty, Edge::Empty]);
    }

    #[test]
    fn test_load_from_millis() {
        let mut buffer = DigitBuffer::new();
        buffer.load_from_millis(3_723_000);
        assert_eq!(buffer.hours(), 1);
        assert_eq!(buffer.minutes(), 2);
        assert_eq!(buffer.seconds(), 3);
        assert_eq!(buffer.cursor(), Some(4));
    }

    #[test]
    fn test_load_from_millis_round_trip() {
        for millis in [
            1_000,
            59_000,
            3_723_000,
            12 * HOUR_IN_MILLIS + 34 * MINUTE_IN_MILLIS + 56 * SECOND_IN_MILLIS,
            99 * HOUR_IN_MILLIS + 59 * MINUTE_IN_MILLIS + 59 * SECOND_IN_MILLIS,
        ] {
            let mut buffer = DigitBuffer::new();
            buffer.load_from_millis(millis);
            assert_eq!(buffer.time_in_millis(), millis);
        }
    }

    #[test]
    fn test_load_from_millis_drops_sub_seconds() {
        let mut buffer = DigitBuffer::new();
        buffer.load_from_millis(5_999);
        assert_eq!(buffer.time_in_millis(), 5_000);
    }

    #[test]
    fn test_load_from_millis_truncates_hours() {
        let mut buffer = DigitBuffer::new();
        buffer.load_from_millis(150 * HOUR_IN_MILLIS + 7 * SECOND_IN_MILLIS);
        assert_eq!(buffer.hours(), 50);
        assert_eq!(buffer.seconds(), 7);
        assert_eq!(buffer.cursor(), Some(5));
    }

    #[test]
    fn test_load_zero_matches_reset() {
        let (mut buffer, recorder) = recorded();
        buffer.load_from_millis(90_000);
        buffer.load_from_millis(0);
        assert_eq!(buffer.slots(), DigitBuffer::new().slots());
        assert_eq!(buffer.state(), BufferState::Empty);
        assert_eq!(recorder.edges(), vec![Edge::NonEmpty, Edge::Empty]);

        buffer.load_from_millis(0);
        assert_eq!(recorder.edges().len(), 2);
    }

    #[test]
    fn test_load_within_filled_fires_nothing() {
        let (mut buffer, recorder) = recorded();
        buffer.append(5).unwrap();
        buffer.load_from_millis(HOUR_IN_MILLIS);
        assert_eq!(buffer.state(), BufferState::Filled(4));
        assert_eq!(recorder.edges(), vec![Edge::NonEmpty]);
    }

    #[test]
    fn test_field_setters_keep_other_fields() {
        let mut buffer = DigitBuffer::new();
        buffer.set_minutes(10);
        buffer.set_seconds(20);
        buffer.set_hours(5);
        assert_eq!(buffer.hours(), 5);
        assert_eq!(buffer.minutes(), 10);
        assert_eq!(buffer.seconds(), 20);

        buffer.set_minutes(30);
        assert_eq!((buffer.hours(), buffer.minutes(), buffer.seconds()), (5, 30, 20));
    }

    #[test]
    fn test_setter_renormalizes_typed_overflow() {
        // 99 typed minutes become 1h 39m once rebuilt
        let mut buffer = typed(&[9, 9, 0, 0]);
        assert_eq!(buffer.minutes(), 99);
        buffer.set_seconds(0);
        assert_eq!((buffer.hours(), buffer.minutes(), buffer.seconds()), (1, 39, 0));
    }

    #[test]
    fn test_replacing_listener() {
        let first = Recorder::default();
        let second = Recorder::default();
        let mut buffer = DigitBuffer::new();
        buffer.set_listener(first.clone());
        buffer.set_listener(second.clone());
        buffer.append(1).unwrap();
        assert!(first.edges().is_empty());
        assert_eq!(second.edges(), vec![Edge::NonEmpty]);

        buffer.clear_listener();
        buffer.delete();
        assert_eq!(second.edges(), vec![Edge::NonEmpty]);
    }

    /// Clears the buffer as soon as it receives input
    struct Rejecting {
        inner: Recorder,
    }

    impl InputListener for Rejecting {
        fn on_became_non_empty(&mut self, buffer: &mut DigitBuffer) {
            self.inner.on_became_non_empty(buffer);
            buffer.reset();
        }

        fn on_became_empty(&mut self, buffer: &mut DigitBuffer) {
            self.inner.on_became_empty(buffer);
        }
    }

    #[test]
    fn test_reentrant_listener() {
        let recorder = Recorder::default();
        let mut buffer = DigitBuffer::new();
        buffer.set_listener(Rejecting {
            inner: recorder.clone(),
        });

        buffer.append(3).unwrap();
        assert_eq!(buffer.state(), BufferState::Empty);
        assert_eq!(buffer.slots(), [0; CAPACITY]);
        assert_eq!(recorder.edges(), vec![Edge::NonEmpty, Edge::Empty]);

        // listener stays registered
        buffer.append(4).unwrap();
        assert_eq!(recorder.edges().len(), 4);
    }

    struct Swapping {
        replacement: Recorder,
    }

    impl InputListener for Swapping {
        fn on_became_non_empty(&mut self, buffer: &mut DigitBuffer) {
            buffer.set_listener(self.replacement.clone());
        }

        fn on_became_empty(&mut self, _buffer: &mut DigitBuffer) {}
    }

    #[test]
    fn test_listener_replaced_from_callback() {
        let replacement = Recorder::default();
        let mut buffer = DigitBuffer::new();
        buffer.set_listener(Swapping {
            replacement: replacement.clone(),
        });

        buffer.append(1).unwrap();
        assert!(replacement.edges().is_empty());
        buffer.delete();
        assert_eq!(replacement.edges(), vec![Edge::Empty]);
    }

    /// Unregisters itself on the first edge
    struct SelfClearing {
        inner: Recorder,
    }

    impl InputListener for SelfClearing {
        fn on_became_non_empty(&mut self, buffer: &mut DigitBuffer) {
            self.inner.on_became_non_empty(buffer);
            buffer.clear_listener();
        }

        fn on_became_empty(&mut self, buffer: &mut DigitBuffer) {
            self.inner.on_became_empty(buffer);
            buffer.clear_listener();
        }
    }

    #[test]
    fn test_listener_cleared_from_callback() {
        let recorder = Recorder::default();
        let mut buffer = DigitBuffer::new();
        buffer.set_listener(SelfClearing {
            inner: recorder.clone(),
        });

        buffer.append(1).unwrap();
        buffer.delete();
        buffer.append(2).unwrap();
        assert_eq!(recorder.edges(), vec![Edge::NonEmpty]);
    }
}
