//! Base-32 packed account/contract/action identifiers
//!
//! Accounts, contracts, actions and permissions are all identified on the
//! wire by a single `u64`. The value packs up to 12 characters of the
//! alphabet `.12345a-z` (5 bits each, most significant first) plus an
//! optional 13th character restricted to `.1-5a-j` (4 bits). Packing is a
//! pure bijection for valid strings, so authorization matching and trace
//! rendering can work on the numeric form and only unpack for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Alphabet used by the 5-bit symbol encoding, indexed by symbol value.
const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// A packed identifier name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(pub u64);

/// Errors from parsing a display string into a [`Name`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// More than 13 characters.
    #[error("name too long: {0:?} exceeds 13 characters")]
    TooLong(String),

    /// Character outside the `.12345a-z` alphabet.
    #[error("invalid character {ch:?} in name {name:?}")]
    BadChar { name: String, ch: char },

    /// 13th character must fit in 4 bits (`.` `1`-`5` `a`-`j`).
    #[error("invalid 13th character {ch:?} in name {name:?}")]
    BadTrailingChar { name: String, ch: char },
}

fn char_to_symbol(c: u8) -> Option<u64> {
    match c {
        b'a'..=b'z' => Some(u64::from(c - b'a') + 6),
        b'1'..=b'5' => Some(u64::from(c - b'1') + 1),
        b'.' => Some(0),
        _ => None,
    }
}

impl Name {
    /// Numeric value of the packed name.
    pub fn value(self) -> u64 {
        self.0
    }

    /// True for the empty name (all dots).
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() > 13 {
            return Err(NameError::TooLong(s.to_string()));
        }

        let mut value: u64 = 0;
        for (i, &c) in bytes.iter().enumerate() {
            let sym = char_to_symbol(c).ok_or_else(|| NameError::BadChar {
                name: s.to_string(),
                ch: c as char,
            })?;
            if i < 12 {
                value |= (sym & 0x1f) << (64 - 5 * (i + 1));
            } else {
                // 13th character only has 4 bits of room
                if sym > 0x0f {
                    return Err(NameError::BadTrailingChar {
                        name: s.to_string(),
                        ch: c as char,
                    });
                }
                value |= sym;
            }
        }
        Ok(Name(value))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = [b'.'; 13];
        let mut tmp = self.0;
        for i in (0..13).rev() {
            let mask = if i == 12 { 0x0f } else { 0x1f };
            chars[i] = CHARMAP[(tmp & mask) as usize];
            tmp >>= if i == 12 { 4 } else { 5 };
        }
        let s = std::str::from_utf8(&chars).expect("charmap is ascii");
        f.write_str(s.trim_end_matches('.'))
    }
}

impl From<u64> for Name {
    fn from(value: u64) -> Self {
        Name(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for s in ["wasmio", "alice", "transfer", "setcode", "a", "5", "abcdefghijkl"] {
            let name: Name = s.parse().unwrap();
            assert_eq!(name.to_string(), s, "round trip of {s:?}");
        }
    }

    #[test]
    fn test_thirteen_chars() {
        let name: Name = "abcdefghijklj".parse().unwrap();
        assert_eq!(name.to_string(), "abcdefghijklj");
    }

    #[test]
    fn test_interior_dots_preserved() {
        let name: Name = "a.b".parse().unwrap();
        assert_eq!(name.to_string(), "a.b");
    }

    #[test]
    fn test_empty_name() {
        let name: Name = "".parse().unwrap();
        assert!(name.is_empty());
        assert_eq!(name.to_string(), "");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!("Alice".parse::<Name>(), Err(NameError::BadChar { .. })));
        assert!(matches!("with space".parse::<Name>(), Err(NameError::BadChar { .. })));
        assert!(matches!("0start".parse::<Name>(), Err(NameError::BadChar { .. })));
        assert!(matches!(
            "abcdefghijklmn".parse::<Name>(),
            Err(NameError::TooLong(_))
        ));
        // 'z' does not fit in the 4-bit trailing slot
        assert!(matches!(
            "abcdefghijklz".parse::<Name>(),
            Err(NameError::BadTrailingChar { .. })
        ));
    }

    #[test]
    fn test_ordering_is_numeric() {
        let a: Name = "alice".parse().unwrap();
        let b: Name = "bob".parse().unwrap();
        assert_eq!(a < b, a.value() < b.value());
    }
}
