use rand::RngCore;
use sha2::{Digest, Sha256};

/// Recovery tokens are only honored for this long after issuance.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Mints a recovery token. The raw value goes to the user out-of-band; only
/// the hash is ever persisted, so a leaked user row cannot be replayed.
///
/// Returns `(raw, hash)`.
pub fn generate_reset_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);

    let raw = hex::encode(bytes);
    let hash = hash_reset_token(&raw);
    (raw, hash)
}

/// One-way hash applied both when storing a freshly minted token and when
/// looking up a presented one.
pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
