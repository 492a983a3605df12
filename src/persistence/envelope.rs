//! Sealed integer envelope
//!
//! The score is XORed with a keystream derived from the key and a random
//! nonce, then version, nonce and payload are covered by a keyed digest.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::PersistenceError;

pub const ENVELOPE_VERSION: u32 = 1;

const STREAM_CONTEXT: &str = "flappy-gates 2026-10 best score keystream";
const DIGEST_CONTEXT: &str = "flappy-gates 2026-10 best score digest";

/// 256-bit sealing key
#[derive(Clone, PartialEq, Eq)]
pub struct SealKey([u8; 32]);

impl SealKey {
    pub fn generate() -> Self {
        let mut key = [0u8; 32];
        rand::rng().fill(&mut key[..]);
        Self(key)
    }

    /// `None` unless exactly 32 bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let key: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn keystream(&self, nonce: &[u8; 16]) -> [u8; 8] {
        let stream_key = blake3::derive_key(STREAM_CONTEXT, &self.0);
        let mut hasher = blake3::Hasher::new_keyed(&stream_key);
        hasher.update(nonce);
        let mut out = [0u8; 8];
        hasher.finalize_xof().fill(&mut out);
        out
    }

    fn digest(&self, version: u32, nonce: &[u8; 16], payload: &[u8; 8]) -> blake3::Hash {
        let digest_key = blake3::derive_key(DIGEST_CONTEXT, &self.0);
        let mut hasher = blake3::Hasher::new_keyed(&digest_key);
        hasher.update(&version.to_le_bytes());
        hasher.update(nonce);
        hasher.update(payload);
        hasher.finalize()
    }
}

impl std::fmt::Debug for SealKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SealKey(..)")
    }
}

/// On-disk form of a sealed score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u32,
    pub nonce: [u8; 16],
    pub payload: [u8; 8],
    /// Hex BLAKE3 keyed hash
    pub digest: String,
}

impl Envelope {
    pub fn seal(key: &SealKey, value: u32) -> Self {
        let mut nonce = [0u8; 16];
        rand::rng().fill(&mut nonce[..]);
        Self::seal_with_nonce(key, value, nonce)
    }

    pub fn seal_with_nonce(key: &SealKey, value: u32, nonce: [u8; 16]) -> Self {
        let stream = key.keystream(&nonce);
        let mut payload = u64::from(value).to_le_bytes();
        for (b, k) in payload.iter_mut().zip(stream) {
            *b ^= k;
        }
        let digest = key.digest(ENVELOPE_VERSION, &nonce, &payload);
        Self {
            version: ENVELOPE_VERSION,
            nonce,
            payload,
            digest: digest.to_hex().to_string(),
        }
    }

    pub fn open(&self, key: &SealKey) -> Result<u32, PersistenceError> {
        if self.version != ENVELOPE_VERSION {
            return Err(PersistenceError::Decryption(format!(
                "unsupported envelope version {}",
                self.version
            )));
        }
        let stored = blake3::Hash::from_hex(&self.digest)
            .map_err(|e| PersistenceError::Decryption(format!("bad digest: {e}")))?;
        // blake3::Hash equality is constant-time
        if stored != key.digest(self.version, &self.nonce, &self.payload) {
            return Err(PersistenceError::Decryption(
                "digest mismatch".to_string(),
            ));
        }

        let stream = key.keystream(&self.nonce);
        let mut plain = self.payload;
        for (b, k) in plain.iter_mut().zip(stream) {
            *b ^= k;
        }
        u32::try_from(u64::from_le_bytes(plain))
            .map_err(|_| PersistenceError::Decryption("score out of range".to_string()))
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string(self).map_err(|e| PersistenceError::Io(e.into()))
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(json)
            .map_err(|e| PersistenceError::Decryption(format!("unreadable envelope: {e}")))
    }
}
