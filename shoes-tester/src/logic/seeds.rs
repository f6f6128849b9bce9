use anyhow::{Context, Result};
use shoes_game::{CareerId, ReplayCode};
use std::collections::HashSet;

pub const DEFAULT_SEED: u64 = 1337;

/// A seed to run, plus the replay code it was typed as.
///
/// Numeric seeds run in every career; a replay code only runs in its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedInfo {
    pub seed: u64,
    pub replay: Option<ReplayCode>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, replay: None }
    }

    #[must_use]
    pub fn from_replay(code: ReplayCode) -> Self {
        Self {
            seed: code.seed(),
            replay: Some(code),
        }
    }

    #[must_use]
    pub fn career(&self) -> Option<CareerId> {
        self.replay.map(ReplayCode::career)
    }

    #[must_use]
    pub fn matches_career(&self, career: CareerId) -> bool {
        self.career().is_none_or(|source| source == career)
    }

    /// Code that replays this seed in `career`, if one exists.
    #[must_use]
    pub fn replay_code_for(&self, career: CareerId) -> Option<ReplayCode> {
        self.replay
            .filter(|code| code.career() == career)
            .or_else(|| ReplayCode::from_seed(career, self.seed))
    }
}

fn parse_seed_token(token: &str) -> Result<SeedInfo> {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        let seed = token
            .parse()
            .with_context(|| format!("seed {token} does not fit in 64 bits"))?;
        return Ok(SeedInfo::from_numeric(seed));
    }
    let code: ReplayCode = token
        .parse()
        .context("seeds are unsigned integers or replay codes such as DR-ORANGE42")?;
    Ok(SeedInfo::from_replay(code))
}

/// Turn `--seeds` tokens into the seeds to run, in order, without repeats.
/// Falls back to [`DEFAULT_SEED`] when nothing was given.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seen: HashSet<(Option<CareerId>, u64)> = HashSet::new();
    let mut seeds = Vec::new();

    for token in tokens.iter().map(|token| token.trim()).filter(|t| !t.is_empty()) {
        let info = parse_seed_token(token)?;
        if seen.insert((info.career(), info.seed)) {
            seeds.push(info);
        }
    }

    if seeds.is_empty() {
        seeds.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }
    Ok(seeds)
}
