//! Deterministic RNG streams segregated by simulation domain.
//!
//! Spawn rolls and bonus rolls draw from independent streams so that the
//! number of spawner fires never perturbs claim payouts for a given seed.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Bundle of seedable RNG streams, one per simulation concern.
#[derive(Debug, Clone)]
pub struct RngBundle {
    spawn: RefCell<ChaCha20Rng>,
    bonus: RefCell<ChaCha20Rng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            spawn: RefCell::new(ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"spawn"))),
            bonus: RefCell::new(ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"bonus"))),
        }
    }

    /// Access the golden-event spawn stream.
    #[must_use]
    pub fn spawn(&self) -> RefMut<'_, ChaCha20Rng> {
        self.spawn.borrow_mut()
    }

    /// Access the golden-event bonus stream.
    #[must_use]
    pub fn bonus(&self) -> RefMut<'_, ChaCha20Rng> {
        self.bonus.borrow_mut()
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
