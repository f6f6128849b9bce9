//! Deterministic RNG streams derived from a single user seed.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Deterministic bundle of RNG streams segregated by game domain.
///
/// Each stream is seeded independently, so drawing more options for one
/// patient never shifts which patients were dealt.
#[derive(Debug, Clone)]
pub struct RngBundle {
    deck: RefCell<CountingRng<SmallRng>>,
    layout: RefCell<CountingRng<SmallRng>>,
    beats: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let deck = CountingRng::new(derive_stream_seed(seed, b"deck"));
        let layout = CountingRng::new(derive_stream_seed(seed, b"layout"));
        let beats = CountingRng::new(derive_stream_seed(seed, b"beats"));
        Self {
            deck: RefCell::new(deck),
            layout: RefCell::new(layout),
            beats: RefCell::new(beats),
        }
    }

    /// Stream used to pick which catalog items are dealt.
    #[must_use]
    pub fn deck(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.deck.borrow_mut()
    }

    /// Stream used to shuffle answer options and inventories.
    #[must_use]
    pub fn layout(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.layout.borrow_mut()
    }

    /// Stream used to synthesize beat schedules.
    #[must_use]
    pub fn beats(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.beats.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// HMAC-SHA256 keyed by the user seed; the domain tag separates streams.
pub(crate) fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        // unreachable: HMAC accepts keys of any length
        return user_seed ^ u64::from(domain_tag.iter().fold(0u8, |acc, b| acc ^ b));
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
