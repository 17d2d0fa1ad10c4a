//! Bit and pin-pattern helpers shared by the machine, the rules checker
//! and the key generator.

pub mod bits;
pub mod pins;
