//! Random key generation.
//!
//! Patterns are drawn by rejection sampling: pick an allowed cross count,
//! scatter that many crosses at random, keep the pattern if the wheel's
//! full rule accepts it. The motor wheels come first because the dot
//! count of mu37 selects the psi rule row.
//!
//! The random source is injected, so a seeded RNG gives reproducible keys:
//!
//! ```
//! use lorenz_sz42::{rules, KeyGenerator};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut generator = KeyGenerator::new(StdRng::seed_from_u64(42));
//! let key = generator.generate_key().unwrap();
//! assert!(rules::check_key_text(&key).unwrap().is_ok());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::error::Sz42Error;
use crate::key::{self, KeySetting, CHI_WHEELS, PSI_WHEELS, WHEEL_COUNT, WHEEL_LAYOUT};
use crate::machine::Sz42Machine;
use crate::rules::{self, tables};
use crate::wheel::Wheel;

const MU1_INDEX: usize = CHI_WHEELS + PSI_WHEELS;
const MU2_INDEX: usize = MU1_INDEX + 1;

/// Generates rule-abiding keys from a random source.
///
/// Without a bound the generator retries each wheel until a valid pattern
/// turns up. [`with_max_attempts`](Self::with_max_attempts) caps the
/// retries per wheel.
#[derive(Debug, Clone)]
pub struct KeyGenerator<R> {
    rng: R,
    max_attempts: Option<usize>,
}

impl Default for KeyGenerator<StdRng> {
    /// A generator seeded from the operating system.
    fn default() -> Self {
        KeyGenerator::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> KeyGenerator<R> {
    /// Creates an unbounded generator drawing from `rng`.
    pub fn new(rng: R) -> Self {
        KeyGenerator {
            rng,
            max_attempts: None,
        }
    }

    /// Limits the candidate patterns tried per wheel.
    ///
    /// # Parameters
    /// - `attempts`: Candidates per wheel before giving up.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Generates a complete key: twelve valid patterns and random start
    /// positions.
    ///
    /// # Errors
    /// Returns [`Sz42Error::GenerationExhausted`] if a bound was set and a
    /// wheel ran out of attempts. An unbounded generator never fails.
    pub fn generate_setting(&mut self) -> Result<KeySetting, Sz42Error> {
        let mut patterns: [Vec<bool>; WHEEL_COUNT] = Default::default();

        let mu1_targets: Vec<usize> = (tables::MU1_MIN_CROSSES..=tables::MU1_MAX_CROSSES)
            .filter(|&crosses| tables::mu1_crosses_allowed(crosses))
            .collect();
        patterns[MU1_INDEX] = self.generate_pattern(MU1_INDEX, &mu1_targets, rules::check_mu1)?;

        let mu2_length = WHEEL_LAYOUT[MU2_INDEX].1;
        let mu2_targets: Vec<usize> = (tables::MU2_MIN_DOTS..=tables::MU2_MAX_DOTS)
            .map(|dots| mu2_length - dots)
            .collect();
        patterns[MU2_INDEX] = self.generate_pattern(MU2_INDEX, &mu2_targets, rules::check_mu2)?;
        let dots_in_mu2 = patterns[MU2_INDEX].iter().filter(|&&p| !p).count();

        for (i, rule) in tables::CHI_RULES.iter().enumerate() {
            patterns[i] =
                self.generate_pattern(i, rule.crosses, |w| rules::check_chi_wheel(w, i))?;
        }
        for i in 0..PSI_WHEELS {
            patterns[CHI_WHEELS + i] = self.generate_pattern(CHI_WHEELS + i, tables::PSI_CROSSES, |w| {
                rules::check_psi_wheel(w, i, dots_in_mu2)
            })?;
        }

        let mut positions = [0usize; WHEEL_COUNT];
        for (position, &(_, length)) in positions.iter_mut().zip(&WHEEL_LAYOUT) {
            *position = self.rng.random_range(0..length);
        }

        Ok(KeySetting {
            patterns,
            positions,
        })
    }

    /// Generates a key and loads it into `machine`.
    ///
    /// On error `machine` is left untouched.
    ///
    /// # Errors
    /// See [`generate_setting`](Self::generate_setting).
    pub fn generate_into(&mut self, machine: &mut Sz42Machine) -> Result<(), Sz42Error> {
        let setting = self.generate_setting()?;
        machine.apply(&setting);
        debug!(
            positions = %key::positions_line(&setting.positions),
            "key generated"
        );
        Ok(())
    }

    /// Generates a key and returns its text.
    ///
    /// # Errors
    /// See [`generate_setting`](Self::generate_setting).
    pub fn generate_key(&mut self) -> Result<String, Sz42Error> {
        let setting = self.generate_setting()?;
        debug!(
            positions = %key::positions_line(&setting.positions),
            "key generated"
        );
        Ok(setting.to_string())
    }

    /// Draws patterns for wheel `index` until `accept` passes one.
    fn generate_pattern(
        &mut self,
        index: usize,
        targets: &[usize],
        accept: impl Fn(&Wheel) -> bool,
    ) -> Result<Vec<bool>, Sz42Error> {
        let (name, length) = WHEEL_LAYOUT[index];
        let mut wheel = Wheel::new(name, length);
        let mut attempt = 0;
        loop {
            if let Some(max) = self.max_attempts {
                if attempt >= max {
                    warn!(wheel = name, attempts = max, "key generation gave up");
                    return Err(Sz42Error::GenerationExhausted {
                        wheel: name,
                        attempts: max,
                    });
                }
            }
            attempt += 1;

            let target = targets[self.rng.random_range(0..targets.len())];
            wheel.clear_pins();
            let mut crosses = 0;
            while crosses < target {
                let pin = self.rng.random_range(0..length);
                if !wheel.pins()[pin] {
                    wheel.activate_pin(pin);
                    crosses += 1;
                }
            }

            if accept(&wheel) {
                return Ok(wheel.pins().to_vec());
            }
            trace!(wheel = name, attempt, crosses = target, "rejected candidate pattern");
        }
    }
}
