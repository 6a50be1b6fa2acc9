use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal grade band for a raw score. `A` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Band {
    A,
    B,
    C,
    D,
    E,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::A, Band::B, Band::C, Band::D, Band::E];

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::A => "A",
            Band::B => "B",
            Band::C => "C",
            Band::D => "D",
            Band::E => "E",
        }
    }

    pub fn parse(s: &str) -> Option<Band> {
        Band::ALL.into_iter().find(|b| b.as_str() == s.trim())
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a raw score into a band. Scores are not clamped.
///
/// | Range        | Band |
/// |--------------|------|
/// | >= 85        | A    |
/// | >= 70        | B    |
/// | >= 55        | C    |
/// | >= 40        | D    |
/// | < 40 or NaN  | E    |
pub fn categorize(score: f64) -> Band {
    match score {
        s if s >= 85.0 => Band::A,
        s if s >= 70.0 => Band::B,
        s if s >= 55.0 => Band::C,
        s if s >= 40.0 => Band::D,
        _ => Band::E,
    }
}
