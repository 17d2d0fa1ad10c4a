//! Circular pin-pattern analysis.
//!
//! A pattern is a slice of pins where `true` is a cross (active) and
//! `false` a dot. Every function treats the slice as a ring: the last pin
//! is followed by the first.

/// Counts the crosses in `pins`.
pub fn cross_count(pins: &[bool]) -> usize {
    pins.iter().filter(|&&p| p).count()
}

/// Returns the delta sequence of `pins`.
///
/// Position `i` of the result is a cross iff pin `i` differs from pin
/// `i + 1`, including the wraparound pair `(len - 1, 0)`.
pub fn delta(pins: &[bool]) -> Vec<bool> {
    let len = pins.len();
    (0..len).map(|i| pins[i] != pins[(i + 1) % len]).collect()
}

/// Counts the crosses of the delta sequence without building it.
pub fn delta_cross_count(pins: &[bool]) -> usize {
    let len = pins.len();
    (0..len).filter(|&i| pins[i] != pins[(i + 1) % len]).count()
}

/// Longest runs of consecutive crosses and dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Runs {
    /// Longest run of crosses seen.
    pub crosses: usize,
    /// Longest run of dots seen.
    pub dots: usize,
}

/// Measures the longest runs of crosses and dots in `pins`.
///
/// The scan starts `lookback` pins before index 0 so that a run crossing
/// the wraparound is counted in one piece. Runs longer than `lookback`
/// plus their tail after the wrap may be under-reported, which is harmless
/// as long as `lookback` is at least the limit the result is compared
/// against: such a run always exceeds it.
pub fn longest_runs(pins: &[bool], lookback: usize) -> Runs {
    let len = pins.len() as isize;
    let mut runs = Runs::default();
    if len == 0 {
        return runs;
    }
    let mut crosses = 0;
    let mut dots = 0;
    for i in -(lookback as isize)..len {
        if pins[i.rem_euclid(len) as usize] {
            dots = 0;
            crosses += 1;
        } else {
            crosses = 0;
            dots += 1;
        }
        runs.crosses = runs.crosses.max(crosses);
        runs.dots = runs.dots.max(dots);
    }
    runs
}
