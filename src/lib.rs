//! Lorenz SZ42 teleprinter cipher.
//!
//! The SZ42 ("Tunny") enciphered 5-bit Baudot symbols by XOR with a key
//! stream produced by twelve pinned wheels. This crate simulates the
//! machine, converts between the notations used for Baudot text, checks
//! wheel patterns against the historical pattern rules and generates
//! random rule-abiding keys.
//!
//! # Architecture
//!
//! ```text
//! BaudotCodec   (raw plaintext / readable / British notation  <->  5-bit symbols)
//!     ↓ symbols
//! Sz42Machine   (5 chi + 5 psi + 2 mu Wheels, limitation logic, key text)
//!     ↑ checked by                 ↑ keyed by
//! rules         (pattern rules)    KeyGenerator (rejection sampling over rules)
//! ```
//!
//! # Examples
//!
//! Encrypt and decrypt with a generated key:
//!
//! ```
//! use lorenz_sz42::{CryptSettings, KeyGenerator, Limitation, Notation, Sz42Machine};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let key = KeyGenerator::new(StdRng::seed_from_u64(2024)).generate_key().unwrap();
//!
//! let mut encoder: Sz42Machine = key.parse().unwrap();
//! let mut decoder: Sz42Machine = key.parse().unwrap();
//!
//! let settings = CryptSettings::encrypt(Notation::Raw, Notation::Readable)
//!     .with_limitation(Limitation::Chi2OneBack);
//! let cipher = encoder.crypt("Meet at 9 pm", &settings).unwrap();
//!
//! let settings = CryptSettings::decrypt(Notation::Readable, Notation::Raw)
//!     .with_limitation(Limitation::Chi2OneBack);
//! assert_eq!(decoder.crypt(&cipher, &settings).unwrap(), "MEET AT 9 PM");
//! ```
//!
//! Check a key against the pattern rules:
//!
//! ```
//! use lorenz_sz42::rules;
//!
//! let err = rules::check_key_text("not a key").unwrap_err();
//! assert!(err.to_string().contains("13 lines"));
//! ```

#![deny(clippy::all)]

pub mod baudot;
pub mod error;
pub mod key;
pub mod keygen;
pub mod machine;
pub mod rules;
pub mod utils;
pub mod wheel;

pub use baudot::{BaudotCodec, Notation};
pub use error::{DecodingError, KeyFormatError, Sz42Error};
pub use key::KeySetting;
pub use keygen::KeyGenerator;
pub use machine::{Action, CryptSettings, Limitation, Sz42Machine};
pub use rules::{RuleViolation, RulesReport, WheelCategory};
pub use wheel::Wheel;
