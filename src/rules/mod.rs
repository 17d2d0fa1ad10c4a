//! Wheel pattern rules checking.
//!
//! Historically the wheel patterns of the SZ42 were not chosen freely:
//! cross counts, delta cross counts and runs of equal pins had to stay
//! within fixed bounds. The functions here test a pattern against those
//! bounds and describe every violation found. They never fail; a
//! violation is an answer, not an error.

pub mod tables;

use std::fmt;

use tracing::debug;

use crate::error::KeyFormatError;
use crate::machine::Sz42Machine;
use crate::utils::pins;
use crate::wheel::Wheel;

use self::tables::{
    psi_rule, CHI_RULES, CHI_RUN_LOOKBACK, MU1_MAX_CONSECUTIVE_CROSSES, MU1_MAX_CONSECUTIVE_DOTS,
    MU2_MAX_CONSECUTIVE_CROSSES, MU2_MAX_CONSECUTIVE_DOTS, MU2_MAX_DOTS, MU2_MIN_DOTS,
    MU_RUN_LOOKBACK,
};

/// A single way in which a wheel pattern breaks the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    /// Number of crosses not in the allowed set.
    CrossCount {
        /// Wheel name.
        wheel: &'static str,
        /// Crosses found.
        found: usize,
    },
    /// Number of crosses in the delta not in the allowed set.
    DeltaCrossCount {
        /// Wheel name.
        wheel: &'static str,
        /// Delta crosses found.
        found: usize,
    },
    /// Number of dots outside the allowed range.
    DotCount {
        /// Wheel name.
        wheel: &'static str,
        /// Dots found.
        found: usize,
    },
    /// A run of crosses is too long.
    ConsecutiveCrosses {
        /// Wheel name.
        wheel: &'static str,
        /// Length of the longest run.
        found: usize,
    },
    /// A run of dots is too long.
    ConsecutiveDots {
        /// Wheel name.
        wheel: &'static str,
        /// Length of the longest run.
        found: usize,
    },
    /// The dot count of mu37 selects no psi rule.
    NoPsiRule {
        /// Dots found on mu37.
        dots_in_mu2: usize,
    },
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleViolation::CrossCount { wheel, found } => {
                write!(f, "Invalid number of crosses in wheel {wheel}: {found}")
            }
            RuleViolation::DeltaCrossCount { wheel, found } => {
                write!(f, "Invalid number of crosses in delta of wheel {wheel}: {found}")
            }
            RuleViolation::DotCount { wheel, found } => {
                write!(f, "Invalid number of dots in wheel {wheel}: {found}")
            }
            RuleViolation::ConsecutiveCrosses { wheel, found } => {
                write!(f, "Too many consecutive crosses in wheel {wheel}: {found}")
            }
            RuleViolation::ConsecutiveDots { wheel, found } => {
                write!(f, "Too many consecutive dots in wheel {wheel}: {found}")
            }
            RuleViolation::NoPsiRule { dots_in_mu2 } => write!(
                f,
                "Invalid number of dots in mu37: {dots_in_mu2}, cannot select psi rule"
            ),
        }
    }
}

/// Wheel groups reported separately by [`check_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelCategory {
    /// The five chi wheels.
    Chi,
    /// The five psi wheels.
    Psi,
    /// Motor wheel mu61.
    Mu1,
    /// Motor wheel mu37.
    Mu2,
}

impl fmt::Display for WheelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelCategory::Chi => write!(f, "Chi"),
            WheelCategory::Psi => write!(f, "Psi"),
            WheelCategory::Mu1 => write!(f, "Mu61"),
            WheelCategory::Mu2 => write!(f, "Mu37"),
        }
    }
}

/// Outcome of checking a whole machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RulesReport {
    /// Per category, whether all its wheels follow the rules.
    pub categories: Vec<(WheelCategory, bool)>,
    /// Every violation found, chi wheels first.
    pub violations: Vec<RuleViolation>,
}

impl RulesReport {
    /// Returns true if no wheel breaks a rule.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns whether `category` passed, if it was checked.
    pub fn category_ok(&self, category: WheelCategory) -> Option<bool> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|&(_, ok)| ok)
    }
}

impl fmt::Display for RulesReport {
    /// One summary line per category, then one line per violation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (category, ok) in &self.categories {
            if *ok {
                writeln!(f, "{category} wheel pins set according to rules")?;
            } else {
                writeln!(f, "{category} wheel pins NOT set according to rules")?;
            }
        }
        for violation in &self.violations {
            writeln!(f, "{violation}")?;
        }
        Ok(())
    }
}

// ──────── Single wheel checks ────────

/// Lists the rule violations of chi wheel `chi_index` (0..5).
///
/// # Panics
/// Panics if `chi_index >= 5`.
pub fn chi_wheel_violations(wheel: &Wheel, chi_index: usize) -> Vec<RuleViolation> {
    let rule = &CHI_RULES[chi_index];
    let name = wheel.name();
    let mut violations = Vec::new();

    let crosses = wheel.cross_count();
    if !rule.crosses.contains(&crosses) {
        violations.push(RuleViolation::CrossCount {
            wheel: name,
            found: crosses,
        });
    }
    let delta = wheel.delta_cross_count();
    if !rule.delta_crosses.contains(&delta) {
        violations.push(RuleViolation::DeltaCrossCount {
            wheel: name,
            found: delta,
        });
    }
    let runs = pins::longest_runs(wheel.pins(), CHI_RUN_LOOKBACK);
    if runs.crosses > rule.max_consecutive_crosses {
        violations.push(RuleViolation::ConsecutiveCrosses {
            wheel: name,
            found: runs.crosses,
        });
    }
    if runs.dots > rule.max_consecutive_dots {
        violations.push(RuleViolation::ConsecutiveDots {
            wheel: name,
            found: runs.dots,
        });
    }
    violations
}

/// Returns true if chi wheel `chi_index` follows the rules.
pub fn check_chi_wheel(wheel: &Wheel, chi_index: usize) -> bool {
    chi_wheel_violations(wheel, chi_index).is_empty()
}

/// Lists the rule violations of psi wheel `psi_index` (0..5), given the
/// number of dots on mu37.
///
/// # Panics
/// Panics if `psi_index >= 5`.
pub fn psi_wheel_violations(
    wheel: &Wheel,
    psi_index: usize,
    dots_in_mu2: usize,
) -> Vec<RuleViolation> {
    let Some(rule) = psi_rule(dots_in_mu2) else {
        return vec![RuleViolation::NoPsiRule { dots_in_mu2 }];
    };
    let name = wheel.name();
    let mut violations = Vec::new();

    let crosses = wheel.cross_count();
    if !rule.crosses.contains(&crosses) {
        violations.push(RuleViolation::CrossCount {
            wheel: name,
            found: crosses,
        });
    }
    let delta = wheel.delta_cross_count();
    if !rule.delta_crosses[psi_index].contains(&delta) {
        violations.push(RuleViolation::DeltaCrossCount {
            wheel: name,
            found: delta,
        });
    }
    violations
}

/// Returns true if psi wheel `psi_index` follows the rules.
pub fn check_psi_wheel(wheel: &Wheel, psi_index: usize, dots_in_mu2: usize) -> bool {
    psi_wheel_violations(wheel, psi_index, dots_in_mu2).is_empty()
}

/// Lists the rule violations of motor wheel mu61.
///
/// 5 <= crosses <= 50 and crosses != 37, at most 5 consecutive dots and
/// at most 15 consecutive crosses.
pub fn mu1_violations(wheel: &Wheel) -> Vec<RuleViolation> {
    let name = wheel.name();
    let mut violations = Vec::new();

    let crosses = wheel.cross_count();
    if !tables::mu1_crosses_allowed(crosses) {
        violations.push(RuleViolation::CrossCount {
            wheel: name,
            found: crosses,
        });
    }
    let runs = pins::longest_runs(wheel.pins(), MU_RUN_LOOKBACK);
    if runs.dots > MU1_MAX_CONSECUTIVE_DOTS {
        violations.push(RuleViolation::ConsecutiveDots {
            wheel: name,
            found: runs.dots,
        });
    }
    if runs.crosses > MU1_MAX_CONSECUTIVE_CROSSES {
        violations.push(RuleViolation::ConsecutiveCrosses {
            wheel: name,
            found: runs.crosses,
        });
    }
    violations
}

/// Returns true if mu61 follows the rules.
pub fn check_mu1(wheel: &Wheel) -> bool {
    mu1_violations(wheel).is_empty()
}

/// Lists the rule violations of motor wheel mu37.
///
/// 14 <= dots <= 28, at most 5 consecutive dots and at most 6 consecutive
/// crosses.
pub fn mu2_violations(wheel: &Wheel) -> Vec<RuleViolation> {
    let name = wheel.name();
    let mut violations = Vec::new();

    let dots = wheel.dot_count();
    if !(MU2_MIN_DOTS..=MU2_MAX_DOTS).contains(&dots) {
        violations.push(RuleViolation::DotCount {
            wheel: name,
            found: dots,
        });
    }
    let runs = pins::longest_runs(wheel.pins(), MU_RUN_LOOKBACK);
    if runs.dots > MU2_MAX_CONSECUTIVE_DOTS {
        violations.push(RuleViolation::ConsecutiveDots {
            wheel: name,
            found: runs.dots,
        });
    }
    if runs.crosses > MU2_MAX_CONSECUTIVE_CROSSES {
        violations.push(RuleViolation::ConsecutiveCrosses {
            wheel: name,
            found: runs.crosses,
        });
    }
    violations
}

/// Returns true if mu37 follows the rules.
pub fn check_mu2(wheel: &Wheel) -> bool {
    mu2_violations(wheel).is_empty()
}

// ──────── Whole machine ────────

/// Checks all twelve wheels of `machine`.
///
/// # Examples
///
/// ```
/// use lorenz_sz42::{rules, Sz42Machine};
///
/// // A fresh machine has all-dot wheels, which break every rule.
/// let report = rules::check_all(&Sz42Machine::new());
/// assert!(!report.is_ok());
/// assert_eq!(report.category_ok(rules::WheelCategory::Chi), Some(false));
/// ```
pub fn check_all(machine: &Sz42Machine) -> RulesReport {
    let mut report = RulesReport::default();

    let chi: Vec<RuleViolation> = machine
        .chi_wheels()
        .iter()
        .enumerate()
        .flat_map(|(i, wheel)| chi_wheel_violations(wheel, i))
        .collect();
    report.record(WheelCategory::Chi, chi);

    let dots_in_mu2 = machine.mu_wheels()[1].dot_count();
    let psi: Vec<RuleViolation> = if psi_rule(dots_in_mu2).is_some() {
        machine
            .psi_wheels()
            .iter()
            .enumerate()
            .flat_map(|(i, wheel)| psi_wheel_violations(wheel, i, dots_in_mu2))
            .collect()
    } else {
        vec![RuleViolation::NoPsiRule { dots_in_mu2 }]
    };
    report.record(WheelCategory::Psi, psi);

    report.record(WheelCategory::Mu1, mu1_violations(&machine.mu_wheels()[0]));
    report.record(WheelCategory::Mu2, mu2_violations(&machine.mu_wheels()[1]));
    report
}

/// Returns true if every wheel of `machine` follows the rules.
pub fn check_rules(machine: &Sz42Machine) -> bool {
    check_all(machine).is_ok()
}

/// Parses `key` and checks the resulting wheels.
///
/// # Errors
/// Returns a [`KeyFormatError`] if `key` is not a well-formed key text.
pub fn check_key_text(key: &str) -> Result<RulesReport, KeyFormatError> {
    let mut machine = Sz42Machine::new();
    machine.set_key(key)?;
    Ok(check_all(&machine))
}

impl RulesReport {
    fn record(&mut self, category: WheelCategory, violations: Vec<RuleViolation>) {
        let ok = violations.is_empty();
        if !ok {
            debug!(%category, count = violations.len(), "wheel category breaks rules");
        }
        self.categories.push((category, ok));
        self.violations.extend(violations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel(name: &'static str, pattern: &str) -> Wheel {
        let mut w = Wheel::new(name, pattern.len());
        let pins: Vec<bool> = pattern.chars().map(|c| c == 'x').collect();
        w.set_pins(&pins);
        w
    }

    const CHI1: &str = "xxx.xxx.x.....xx.x.x....xx.xxxxx.x...x...";
    const PSI1: &str = "x.x..x.xx.x.xx.xx..x.xxx...x.x.xxx..x.xx...";
    const MU61: &str = "...xxxx....xxx.x...xxx.x...x.x.x.xxxxx.xx..xxxx..xx.....x..x.";
    const MU37: &str = ".x.x.x.xx.x..xxx.xx...x.xxxxxx.x...x.";

    #[test]
    fn test_valid_chi_wheel() {
        assert!(check_chi_wheel(&wheel("chi1", CHI1), 0));
    }

    #[test]
    fn test_chi_wheel_wrong_rule_index() {
        // 20 crosses are not allowed on chi2 (15 or 16).
        let violations = chi_wheel_violations(&wheel("chi1", CHI1), 1);
        assert!(violations.contains(&RuleViolation::CrossCount {
            wheel: "chi1",
            found: 20
        }));
    }

    #[test]
    fn test_chi_wheel_long_run_across_wraparound() {
        // 20 crosses, 20 delta crosses, but a run of 6 crosses across the wrap.
        let pattern = "xxx...xx..xx..xx..xx..xx..x..x..x..x..xxx";
        let w = wheel("chi1", pattern);
        assert_eq!(w.cross_count(), 20);
        assert_eq!(w.delta_cross_count(), 20);
        let violations = chi_wheel_violations(&w, 0);
        assert_eq!(
            violations,
            vec![RuleViolation::ConsecutiveCrosses {
                wheel: "chi1",
                found: 6
            }]
        );
    }

    #[test]
    fn test_all_dots_chi_wheel() {
        let violations = chi_wheel_violations(&Wheel::new("chi5", 23), 4);
        assert_eq!(
            violations,
            vec![
                RuleViolation::CrossCount {
                    wheel: "chi5",
                    found: 0
                },
                RuleViolation::DeltaCrossCount {
                    wheel: "chi5",
                    found: 0
                },
                RuleViolation::ConsecutiveDots {
                    wheel: "chi5",
                    found: 28
                },
            ]
        );
    }

    #[test]
    fn test_valid_psi_wheel() {
        assert!(check_psi_wheel(&wheel("psi1", PSI1), 0, 17));
    }

    #[test]
    fn test_psi_wheel_depends_on_mu2_dots() {
        // 28 delta crosses fit dots 16..=19 for psi1, not 14.
        let w = wheel("psi1", PSI1);
        assert!(check_psi_wheel(&w, 0, 16));
        assert!(!check_psi_wheel(&w, 0, 14));
    }

    #[test]
    fn test_psi_wheel_without_rule() {
        let violations = psi_wheel_violations(&wheel("psi1", PSI1), 0, 29);
        assert_eq!(violations, vec![RuleViolation::NoPsiRule { dots_in_mu2: 29 }]);
    }

    #[test]
    fn test_valid_mu_wheels() {
        assert!(check_mu1(&wheel("mu61", MU61)));
        assert!(check_mu2(&wheel("mu37", MU37)));
    }

    #[test]
    fn test_mu1_forbidden_cross_count() {
        // 37 crosses, no run rule broken.
        let w = wheel(
            "mu61",
            "xxx.xxx.xxx.xxx.xxx.xxx.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x",
        );
        assert_eq!(
            mu1_violations(&w),
            vec![RuleViolation::CrossCount {
                wheel: "mu61",
                found: 37
            }]
        );
    }

    #[test]
    fn test_mu1_long_dot_run() {
        let mut pattern = String::from("......");
        pattern.push_str(&"x.".repeat(27));
        pattern.push('x');
        let w = wheel("mu61", &pattern);
        assert_eq!(w.len(), 61);
        assert!(mu1_violations(&w).contains(&RuleViolation::ConsecutiveDots {
            wheel: "mu61",
            found: 6
        }));
    }

    #[test]
    fn test_mu2_cross_run_limit() {
        // Seven crosses in a row break the mu37 limit of six.
        let mut pattern = String::from("xxxxxxx");
        pattern.push_str(&".x".repeat(14));
        pattern.push_str("..");
        let w = wheel("mu37", &pattern);
        assert_eq!(w.len(), 37);
        assert!(mu2_violations(&w).contains(&RuleViolation::ConsecutiveCrosses {
            wheel: "mu37",
            found: 7
        }));
    }

    #[test]
    fn test_mu2_dot_count() {
        let w = wheel("mu37", &"x".repeat(37));
        assert!(mu2_violations(&w).contains(&RuleViolation::DotCount {
            wheel: "mu37",
            found: 0
        }));
    }

    #[test]
    fn test_report_display() {
        let report = RulesReport {
            categories: vec![(WheelCategory::Chi, true), (WheelCategory::Mu2, false)],
            violations: vec![RuleViolation::DotCount {
                wheel: "mu37",
                found: 3,
            }],
        };
        assert_eq!(
            report.to_string(),
            "Chi wheel pins set according to rules\n\
             Mu37 wheel pins NOT set according to rules\n\
             Invalid number of dots in wheel mu37: 3\n"
        );
        assert!(!report.is_ok());
        assert_eq!(report.category_ok(WheelCategory::Psi), None);
    }

    #[test]
    fn test_fresh_machine_fails_every_category() {
        let report = check_all(&Sz42Machine::new());
        assert_eq!(report.categories.len(), 4);
        assert!(report.categories.iter().all(|(_, ok)| !ok));
        // mu37 with 37 dots selects no psi rule.
        assert!(report
            .violations
            .contains(&RuleViolation::NoPsiRule { dots_in_mu2: 37 }));
    }

    #[test]
    fn test_check_key_text_rejects_malformed_key() {
        assert!(matches!(
            check_key_text("x.x"),
            Err(KeyFormatError::WrongLineCount { .. })
        ));
    }
}
