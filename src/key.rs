//! Key text format.
//!
//! A key is 13 newline-separated lines: one `x`/`.` pin pattern per wheel
//! in the order chi1..chi5, psi1..psi5, mu61, mu37, then one line of start
//! positions grouped as `chi|psi|mu`, each group `:`-separated:
//!
//! ```text
//! xxx.xxx.x.....xx.x.x....xx.xxxxx.x...x...
//! ...                                  (11 more pattern lines)
//! 0:0:0:0:0|0:0:0:0:0|0:0
//! ```
//!
//! [`parse`] validates a whole key into a [`KeySetting`] without touching
//! any machine, so a rejected key never leaves a machine half-loaded.

use std::fmt;

use crate::error::KeyFormatError;
use crate::wheel::{CROSS, DOT};

/// Number of chi wheels.
pub const CHI_WHEELS: usize = 5;
/// Number of psi wheels.
pub const PSI_WHEELS: usize = 5;
/// Number of motor wheels.
pub const MU_WHEELS: usize = 2;
/// Total number of wheels.
pub const WHEEL_COUNT: usize = CHI_WHEELS + PSI_WHEELS + MU_WHEELS;
/// Lines in a key text: one per wheel plus the position line.
pub const KEY_LINES: usize = WHEEL_COUNT + 1;

/// Name and length of every wheel, in key text order.
pub const WHEEL_LAYOUT: [(&str, usize); WHEEL_COUNT] = [
    ("chi1", 41),
    ("chi2", 31),
    ("chi3", 29),
    ("chi4", 26),
    ("chi5", 23),
    ("psi1", 43),
    ("psi2", 47),
    ("psi3", 51),
    ("psi4", 53),
    ("psi5", 59),
    ("mu61", 61),
    ("mu37", 37),
];

const POSITION_GROUPS: [(&str, usize, usize); 3] = [
    ("chi", 0, CHI_WHEELS),
    ("psi", CHI_WHEELS, PSI_WHEELS),
    ("mu", CHI_WHEELS + PSI_WHEELS, MU_WHEELS),
];

/// A fully validated key: every wheel's pattern and start position.
///
/// Index `i` of both arrays refers to wheel `WHEEL_LAYOUT[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySetting {
    /// Pin patterns, `true` for a cross.
    pub patterns: [Vec<bool>; WHEEL_COUNT],
    /// Start positions, each below its wheel's length.
    pub positions: [usize; WHEEL_COUNT],
}

impl fmt::Display for KeySetting {
    /// Renders the 13-line key text, without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pattern in &self.patterns {
            writeln!(f, "{}", pattern_string(pattern))?;
        }
        write!(f, "{}", positions_line(&self.positions))
    }
}

/// Renders pins as `x`/`.` text.
pub fn pattern_string(pins: &[bool]) -> String {
    pins.iter().map(|&p| if p { CROSS } else { DOT }).collect()
}

/// Renders twelve start positions as a `chi|psi|mu` line.
pub fn positions_line(positions: &[usize; WHEEL_COUNT]) -> String {
    POSITION_GROUPS
        .iter()
        .map(|&(_, start, count)| {
            positions[start..start + count]
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(":")
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Parses and validates a key text.
///
/// Trailing whitespace after the position line is ignored, and lines may
/// end in `\r\n`.
///
/// # Parameters
/// - `text`: The 13-line key text.
///
/// # Errors
/// Returns the first [`KeyFormatError`] found, scanning lines top to
/// bottom.
///
/// # Examples
///
/// ```
/// use lorenz_sz42::key;
///
/// let err = key::parse("x.x.\n0:0").unwrap_err();
/// assert_eq!(
///     err,
///     lorenz_sz42::KeyFormatError::WrongLineCount { expected: 13, found: 2 }
/// );
/// ```
pub fn parse(text: &str) -> Result<KeySetting, KeyFormatError> {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    if lines.len() != KEY_LINES {
        return Err(KeyFormatError::WrongLineCount {
            expected: KEY_LINES,
            found: lines.len(),
        });
    }

    let mut patterns: [Vec<bool>; WHEEL_COUNT] = Default::default();
    for (i, (&(wheel, length), line)) in WHEEL_LAYOUT.iter().zip(&lines).enumerate() {
        patterns[i] = parse_pattern(line, i + 1, wheel, length)?;
    }
    let positions = parse_positions(lines[WHEEL_COUNT], KEY_LINES)?;

    Ok(KeySetting {
        patterns,
        positions,
    })
}

fn parse_pattern(
    line: &str,
    line_number: usize,
    wheel: &'static str,
    length: usize,
) -> Result<Vec<bool>, KeyFormatError> {
    let found = line.chars().count();
    if found != length {
        return Err(KeyFormatError::WrongPatternLength {
            line: line_number,
            wheel,
            expected: length,
            found,
        });
    }
    line.chars()
        .enumerate()
        .map(|(column, c)| match c {
            CROSS => Ok(true),
            DOT => Ok(false),
            _ => Err(KeyFormatError::InvalidPin {
                line: line_number,
                column,
                wheel,
                character: c,
            }),
        })
        .collect()
}

fn parse_positions(
    line: &str,
    line_number: usize,
) -> Result<[usize; WHEEL_COUNT], KeyFormatError> {
    let groups: Vec<&str> = line.trim().split('|').collect();
    if groups.len() != POSITION_GROUPS.len() {
        return Err(KeyFormatError::WrongGroupCount {
            line: line_number,
            found: groups.len(),
        });
    }

    let mut positions = [0usize; WHEEL_COUNT];
    for (&(group, start, count), entries) in POSITION_GROUPS.iter().zip(groups) {
        let entries: Vec<&str> = entries.split(':').collect();
        if entries.len() != count {
            return Err(KeyFormatError::WrongPositionCount {
                group,
                expected: count,
                found: entries.len(),
            });
        }
        for (offset, entry) in entries.into_iter().enumerate() {
            let (wheel, length) = WHEEL_LAYOUT[start + offset];
            let value = entry.trim();
            let position: usize = value.parse().map_err(|_| KeyFormatError::InvalidPosition {
                wheel,
                value: value.to_string(),
            })?;
            if position >= length {
                return Err(KeyFormatError::PositionOutOfRange {
                    wheel,
                    position,
                    length,
                });
            }
            positions[start + offset] = position;
        }
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERNS: [&str; WHEEL_COUNT] = [
        "xxx.xxx.x.....xx.x.x....xx.xxxxx.x...x...",
        "xx....xx.xx..x.xxx..xxx...x.x.x",
        "x.xx...x....x.xx...xx.xxxxx..",
        "x...xx.x.xx..x.x...x..xxxx",
        "xx..xxx.x.xx.x.....xxx.",
        "x.x..x.xx.x.xx.xx..x.xxx...x.x.xxx..x.xx...",
        "...x.x..x.x.x...x..x..xxx.xx.x.xx.x..x..xx.xxx.",
        ".x.xx..xx.x.x.x.x.x..x.xxxxx.xx.xxx.xx.x.xxx.x.xx..",
        "xx.x.x.xx.xxx.x.xxx.xx.x.xx.xx....x....x.xxx.xx.x.x.x",
        "x.xx..xx.x...x.xx.x..x...x.x.x.x.xxx.xxx.x.x....x.xxxx.x..x",
        "...xxxx....xxx.x...xxx.x...x.x.x.xxxxx.xx..xxxx..xx.....x..x.",
        ".x.x.x.xx.x..xxx.xx...x.xxxxxx.x...x.",
    ];

    fn key_with(positions: &str) -> String {
        let mut text = PATTERNS.join("\n");
        text.push('\n');
        text.push_str(positions);
        text
    }

    fn replace_line(text: &str, index: usize, replacement: &str) -> String {
        let mut lines: Vec<&str> = text.lines().collect();
        lines[index] = replacement;
        lines.join("\n")
    }

    #[test]
    fn test_layout_lengths() {
        let lengths: Vec<usize> = WHEEL_LAYOUT.iter().map(|&(_, len)| len).collect();
        assert_eq!(
            lengths,
            vec![41, 31, 29, 26, 23, 43, 47, 51, 53, 59, 61, 37]
        );
        for (pattern, (_, len)) in PATTERNS.iter().zip(WHEEL_LAYOUT) {
            assert_eq!(pattern.len(), len);
        }
    }

    #[test]
    fn test_parse_valid_key() {
        let setting = parse(&key_with("1:2:3:4:5|6:7:8:9:10|11:12")).unwrap();
        assert_eq!(setting.positions, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(setting.patterns[0].iter().filter(|&&p| p).count(), 20);
        assert_eq!(setting.patterns[11].len(), 37);
    }

    #[test]
    fn test_display_round_trips() {
        let text = key_with("40:30:28:25:22|42:46:50:52:58|60:36");
        let setting = parse(&text).unwrap();
        assert_eq!(setting.to_string(), text);
    }

    #[test]
    fn test_parse_accepts_crlf_and_trailing_newline() {
        let text = key_with("0:0:0:0:0|0:0:0:0:0|0:0").replace('\n', "\r\n") + "\r\n";
        assert!(parse(&text).is_ok());
    }

    #[test]
    fn test_wrong_line_count() {
        let text = PATTERNS.join("\n");
        assert_eq!(
            parse(&text),
            Err(KeyFormatError::WrongLineCount {
                expected: 13,
                found: 12
            })
        );
        assert!(matches!(
            parse(""),
            Err(KeyFormatError::WrongLineCount { found: 0, .. })
        ));
    }

    #[test]
    fn test_wrong_pattern_length() {
        let text = replace_line(&key_with("0:0:0:0:0|0:0:0:0:0|0:0"), 2, "x.x");
        assert_eq!(
            parse(&text),
            Err(KeyFormatError::WrongPatternLength {
                line: 3,
                wheel: "chi3",
                expected: 29,
                found: 3
            })
        );
    }

    #[test]
    fn test_invalid_pin() {
        let mut bad = PATTERNS[11].to_string();
        bad.replace_range(4..5, "o");
        let text = replace_line(&key_with("0:0:0:0:0|0:0:0:0:0|0:0"), 11, &bad);
        assert_eq!(
            parse(&text),
            Err(KeyFormatError::InvalidPin {
                line: 12,
                column: 4,
                wheel: "mu37",
                character: 'o'
            })
        );
    }

    #[test]
    fn test_wrong_group_count() {
        assert_eq!(
            parse(&key_with("0:0:0:0:0|0:0:0:0:0:0:0")),
            Err(KeyFormatError::WrongGroupCount { line: 13, found: 2 })
        );
    }

    #[test]
    fn test_wrong_position_count() {
        assert_eq!(
            parse(&key_with("0:0:0:0:0|0:0:0:0|0:0")),
            Err(KeyFormatError::WrongPositionCount {
                group: "psi",
                expected: 5,
                found: 4
            })
        );
    }

    #[test]
    fn test_non_numeric_position() {
        assert_eq!(
            parse(&key_with("0:0:a:0:0|0:0:0:0:0|0:0")),
            Err(KeyFormatError::InvalidPosition {
                wheel: "chi3",
                value: "a".to_string()
            })
        );
        assert!(matches!(
            parse(&key_with("0:0:0:0:0|0:0:0:0:0|-1:0")),
            Err(KeyFormatError::InvalidPosition { wheel: "mu61", .. })
        ));
    }

    #[test]
    fn test_position_out_of_range() {
        assert_eq!(
            parse(&key_with("0:0:0:0:0|0:0:0:0:0|0:37")),
            Err(KeyFormatError::PositionOutOfRange {
                wheel: "mu37",
                position: 37,
                length: 37
            })
        );
    }

    #[test]
    fn test_positions_line() {
        let positions = [18, 6, 25, 22, 19, 17, 3, 29, 41, 0, 4, 24];
        assert_eq!(positions_line(&positions), "18:6:25:22:19|17:3:29:41:0|4:24");
    }
}
