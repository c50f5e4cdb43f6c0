//! Session token minting.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMode {
    /// 128 random bits from the thread-local CSPRNG.
    #[default]
    Secure,
    /// One draw from a PRNG seeded with `unix time XOR pid`.
    ///
    /// Anyone who knows roughly when a login happened can guess the token.
    /// Only meant for interop with tooling that expects short numeric cookies.
    Legacy,
}

/// Mints a fresh decimal session token.
pub fn mint(mode: TokenMode) -> String {
    match mode {
        TokenMode::Secure => {
            let value: u128 = Standard.sample(&mut rand::thread_rng());
            value.to_string()
        }
        TokenMode::Legacy => {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            legacy_token(now, std::process::id())
        }
    }
}

/// Deterministic for a given (time, pid) pair, which is the whole problem
/// with this mode.
pub fn legacy_token(unix_secs: u64, pid: u32) -> String {
    let mut rng = StdRng::seed_from_u64(unix_secs ^ u64::from(pid));
    // non-negative, like a C `rand()` draw
    (rng.next_u32() >> 1).to_string()
}
