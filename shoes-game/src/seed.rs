//! Replay codes: a career, a word and a two-digit number, e.g. `DR-ORANGE42`.
//!
//! Every code maps to one seed, and the seed keeps the code's index in its low
//! 16 bits, so a seed that came from a code can be turned back into exactly
//! that code. Seeds that did not come from a code have no code.
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::career::CareerId;
use crate::rng::derive_stream_seed;

pub const WORD_LIST: [&str; 64] = [
    "ORANGE", "SCRUBS", "PULSE", "TRIAGE", "SUTURE", "PAGER", "CHART", "VITALS", "GAVEL",
    "DOCKET", "WITNESS", "BRIEF", "VERDICT", "MOTION", "APPEAL", "JURY", "STREAM", "VIRAL",
    "HASHTAG", "REEL", "FILTER", "LIKES", "COLLAB", "TREND", "BALLOT", "PODIUM", "RALLY",
    "SENATE", "MANDATE", "POLL", "CAUCUS", "BUDGET", "CIRCUIT", "DIODE", "SOLDER", "VOLTAGE",
    "WIDGET", "GEARS", "LASER", "ROBOT", "MENTOR", "CAREER", "SHOES", "LADDER", "RESUME",
    "BADGE", "OFFICE", "SHIFT", "LOBBY", "CAMPUS", "LAB", "STUDIO", "COURT", "CLINIC",
    "COUNCIL", "SPARK", "BEACON", "COMPASS", "ANCHOR", "ROCKET", "SUMMIT", "HARBOR", "MEADOW",
    "ZENITH",
];

/// Numbers run `00..=99` after the word.
const NUMBERS_PER_WORD: u16 = 100;
const INDEX_MASK: u64 = 0xFFFF;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid replay code '{0}' (expected e.g. DR-ORANGE42)")]
pub struct InvalidReplayCode(pub String);

/// A parsed replay code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplayCode {
    career: CareerId,
    word: u8,
    number: u8,
}

impl ReplayCode {
    /// `None` when `word` is outside [`WORD_LIST`] or `number` exceeds 99.
    #[must_use]
    pub fn new(career: CareerId, word: usize, number: u8) -> Option<Self> {
        if word >= WORD_LIST.len() || u16::from(number) >= NUMBERS_PER_WORD {
            return None;
        }
        Some(Self {
            career,
            word: u8::try_from(word).ok()?,
            number,
        })
    }

    /// Pick a code from arbitrary entropy, e.g. a clock reading.
    #[must_use]
    pub fn from_entropy(career: CareerId, entropy: u64) -> Self {
        let words = u64::try_from(WORD_LIST.len()).unwrap_or(1);
        let word = u8::try_from(entropy % words).unwrap_or(0);
        let number = u8::try_from((entropy / words) % u64::from(NUMBERS_PER_WORD)).unwrap_or(0);
        Self {
            career,
            word,
            number,
        }
    }

    /// The code that produced `seed` for `career`, if any.
    #[must_use]
    pub fn from_seed(career: CareerId, seed: u64) -> Option<Self> {
        let index = u16::try_from(seed & INDEX_MASK).ok()?;
        let word = usize::from(index / NUMBERS_PER_WORD);
        let number = u8::try_from(index % NUMBERS_PER_WORD).ok()?;
        Self::new(career, word, number).filter(|code| code.seed() == seed)
    }

    #[must_use]
    pub const fn career(self) -> CareerId {
        self.career
    }

    #[must_use]
    pub fn word(self) -> &'static str {
        WORD_LIST[usize::from(self.word)]
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.number
    }

    fn index(self) -> u16 {
        u16::from(self.word) * NUMBERS_PER_WORD + u16::from(self.number)
    }

    /// Gameplay seed for this code. Each career gets its own seed space.
    #[must_use]
    pub fn seed(self) -> u64 {
        let index = self.index();
        let tag = [b"replay/".as_slice(), self.career.replay_prefix().as_bytes()].concat();
        let mixed = derive_stream_seed(u64::from(index), &tag);
        (mixed & !INDEX_MASK) | u64::from(index)
    }
}

impl fmt::Display for ReplayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}{:02}",
            self.career.replay_prefix(),
            self.word(),
            self.number
        )
    }
}

impl FromStr for ReplayCode {
    type Err = InvalidReplayCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidReplayCode(s.to_string());
        let (prefix, rest) = s.trim().split_once('-').ok_or_else(invalid)?;
        let career = CareerId::from_replay_prefix(prefix).ok_or_else(invalid)?;
        let digits = rest.len().checked_sub(2).ok_or_else(invalid)?;
        if digits == 0 || !rest.is_char_boundary(digits) {
            return Err(invalid());
        }
        let (word, number) = rest.split_at(digits);
        if !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u8 = number.parse().map_err(|_| invalid())?;
        let word = WORD_LIST
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(word))
            .ok_or_else(invalid)?;
        Self::new(career, word, number).ok_or_else(invalid)
    }
}

/// Parse a replay code into its career and seed.
#[must_use]
pub fn parse_replay_code(code: &str) -> Option<(CareerId, u64)> {
    code.parse::<ReplayCode>()
        .ok()
        .map(|code| (code.career(), code.seed()))
}
