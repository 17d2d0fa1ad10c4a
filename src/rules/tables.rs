//! Numeric constraint tables for wheel patterns.
//!
//! The chi table is indexed by chi wheel. The psi table is indexed by the
//! number of dots on the second motor wheel (mu37), offset by
//! [`MU2_MIN_DOTS`]: the allowed delta counts of the psi wheels depend on how
//! often the psi wheels move.

/// Constraints on one chi wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChiRule {
    /// Allowed numbers of crosses in the pattern.
    pub crosses: &'static [usize],
    /// Allowed numbers of crosses in the delta of the pattern.
    pub delta_crosses: &'static [usize],
    /// Longest run of consecutive crosses.
    pub max_consecutive_crosses: usize,
    /// Longest run of consecutive dots.
    pub max_consecutive_dots: usize,
}

/// Constraints on the five psi wheels for one mu37 dot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PsiRule {
    /// Allowed numbers of crosses, shared by all psi wheels.
    pub crosses: &'static [usize],
    /// Allowed numbers of delta crosses, per psi wheel.
    pub delta_crosses: [&'static [usize]; 5],
}

/// Lookback for the chi run check, equal to the chi run limit.
pub const CHI_RUN_LOOKBACK: usize = 5;

pub const CHI_RULES: [ChiRule; 5] = [
    chi(&[20, 21], &[20]),
    chi(&[15, 16], &[16]),
    chi(&[14, 15], &[14]),
    chi(&[13], &[12, 14]),
    chi(&[11, 12], &[12]),
];

const fn chi(crosses: &'static [usize], delta_crosses: &'static [usize]) -> ChiRule {
    ChiRule {
        crosses,
        delta_crosses,
        max_consecutive_crosses: 5,
        max_consecutive_dots: 5,
    }
}

/// Allowed psi cross counts, identical for every mu37 dot count.
pub const PSI_CROSSES: &[usize] = &[22, 24, 26, 27, 30];

pub const PSI_RULES: [PsiRule; 15] = [
    /* 14 */ psi([&[26], &[28], &[32], &[32], &[36]]),
    /* 15 */ psi([&[26], &[30], &[32], &[34], &[38]]),
    /* 16 */ psi([&[28], &[30], &[32], &[34], &[38]]),
    /* 17 */ psi([&[28], &[30], &[32, 34], &[34], &[38]]),
    /* 18 */ psi([&[28], &[32], &[34], &[36], &[38]]),
    /* 19 */ psi([&[28], &[32], &[34], &[36], &[40]]),
    /* 20 */ psi([&[30], &[32], &[34, 36], &[36], &[40]]),
    /* 21 */ psi([&[30], &[32], &[36], &[38], &[42]]),
    /* 22 */ psi([&[30], &[34], &[36], &[38], &[42]]),
    /* 23 */ psi([&[32], &[34], &[38], &[38], &[42]]),
    /* 24 */ psi([&[32], &[34], &[38], &[40], &[44]]),
    /* 25 */ psi([&[32], &[36], &[38], &[40], &[44]]),
    /* 26 */ psi([&[34], &[36], &[40], &[40], &[46]]),
    /* 27 */ psi([&[34], &[36, 38], &[40], &[42], &[46]]),
    /* 28 */ psi([&[34], &[38], &[42], &[42], &[48]]),
];

const fn psi(delta_crosses: [&'static [usize]; 5]) -> PsiRule {
    PsiRule {
        crosses: PSI_CROSSES,
        delta_crosses,
    }
}

// ──────── Motor wheels ────────

/// Fewest crosses allowed on mu61.
pub const MU1_MIN_CROSSES: usize = 5;
/// Most crosses allowed on mu61.
pub const MU1_MAX_CROSSES: usize = 50;
/// Cross count mu61 must avoid.
pub const MU1_FORBIDDEN_CROSSES: usize = 37;
/// Longest run of dots on mu61.
pub const MU1_MAX_CONSECUTIVE_DOTS: usize = 5;
/// Longest run of crosses on mu61.
pub const MU1_MAX_CONSECUTIVE_CROSSES: usize = 15;

/// Fewest dots allowed on mu37.
pub const MU2_MIN_DOTS: usize = 14;
/// Most dots allowed on mu37.
pub const MU2_MAX_DOTS: usize = 28;
/// Longest run of dots on mu37.
pub const MU2_MAX_CONSECUTIVE_DOTS: usize = 5;
/// Longest run of crosses on mu37.
pub const MU2_MAX_CONSECUTIVE_CROSSES: usize = 6;

/// Lookback for the motor wheel run checks.
pub const MU_RUN_LOOKBACK: usize = 15;

/// Returns the psi rule row selected by the number of dots on mu37.
///
/// # Returns
/// `None` if `dots_in_mu2` lies outside `14..=28`.
pub fn psi_rule(dots_in_mu2: usize) -> Option<&'static PsiRule> {
    if (MU2_MIN_DOTS..=MU2_MAX_DOTS).contains(&dots_in_mu2) {
        PSI_RULES.get(dots_in_mu2 - MU2_MIN_DOTS)
    } else {
        None
    }
}

/// Returns true if `crosses` is an allowed cross count for mu61.
pub fn mu1_crosses_allowed(crosses: usize) -> bool {
    (MU1_MIN_CROSSES..=MU1_MAX_CROSSES).contains(&crosses) && crosses != MU1_FORBIDDEN_CROSSES
}
