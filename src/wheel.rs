//! Wheel: a circular pin pattern with a rotational position.
//!
//! The SZ42 carries twelve wheels of fixed, pairwise coprime lengths. Each
//! wheel exposes the pin under its reading position, steps by one, and
//! keeps a one-back memory bit that the limitation logic of
//! [`Sz42Machine`](crate::Sz42Machine) reads and writes.

use crate::key;
use crate::utils::pins;

/// Pin state of an active pin in key text.
pub const CROSS: char = 'x';

/// Pin state of an inactive pin in key text.
pub const DOT: char = '.';

/// A single SZ42 wheel.
///
/// The pattern length is fixed at construction; the pattern and position
/// are replaced wholesale when a key is loaded or generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wheel {
    name: &'static str,
    pins: Vec<bool>,
    position: usize,
    one_back: bool,
}

impl Wheel {
    /// Creates a wheel of `length` dots at position 0.
    ///
    /// # Parameters
    /// - `name`: Identifier used in diagnostics (e.g. `chi2`).
    /// - `length`: Number of pins, at least 1.
    ///
    /// # Panics
    /// Panics if `length` is 0.
    pub fn new(name: &'static str, length: usize) -> Self {
        assert!(length > 0, "wheel {name} needs at least one pin");
        Wheel {
            name,
            pins: vec![false; length],
            position: 0,
            one_back: false,
        }
    }

    /// Returns the diagnostic name of the wheel.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of pins.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Returns true if the wheel has no pins.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Returns the pin pattern, index 0 first.
    pub fn pins(&self) -> &[bool] {
        &self.pins
    }

    /// Returns the current reading position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the wheel to `position`, taken modulo the wheel length.
    pub fn set_position(&mut self, position: usize) {
        self.position = position % self.pins.len();
    }

    /// Advances the wheel by one pin.
    pub fn step(&mut self) {
        self.position = (self.position + 1) % self.pins.len();
    }

    /// Returns the pin under the reading position.
    pub fn pin_active(&self) -> bool {
        self.pins[self.position]
    }

    /// Returns the number of crosses in the pattern.
    pub fn cross_count(&self) -> usize {
        pins::cross_count(&self.pins)
    }

    /// Returns the number of dots in the pattern.
    pub fn dot_count(&self) -> usize {
        self.pins.len() - self.cross_count()
    }

    /// Returns the number of crosses in the delta of the pattern.
    pub fn delta_cross_count(&self) -> usize {
        pins::delta_cross_count(&self.pins)
    }

    // ──────── Pattern editing ────────

    /// Replaces the whole pattern.
    ///
    /// Callers guarantee `pins.len() == self.len()`; patterns arriving from
    /// key text are length-checked by [`crate::key::parse`].
    pub(crate) fn set_pins(&mut self, pins: &[bool]) {
        debug_assert_eq!(pins.len(), self.pins.len());
        self.pins.copy_from_slice(pins);
    }

    /// Sets every pin to a dot.
    pub(crate) fn clear_pins(&mut self) {
        self.pins.fill(false);
    }

    /// Sets the pin at `index` to a cross.
    pub(crate) fn activate_pin(&mut self, index: usize) {
        self.pins[index] = true;
    }

    // ──────── Limitation memory ────────

    /// Returns the remembered pin from the previous symbol.
    pub(crate) fn one_back(&self) -> bool {
        self.one_back
    }

    /// Remembers the currently active pin for the next symbol.
    pub(crate) fn remember_active(&mut self) {
        self.one_back = self.pin_active();
    }

    /// Forgets the remembered pin.
    pub(crate) fn reset_one_back(&mut self) {
        self.one_back = false;
    }

    /// Renders the pattern as `x`/`.` text.
    pub fn pattern_string(&self) -> String {
        key::pattern_string(&self.pins)
    }

    /// Overwrites pins, position and memory with zeros.
    pub(crate) fn wipe(&mut self) {
        self.pins.fill(false);
        self.position = 0;
        self.one_back = false;
    }
}
