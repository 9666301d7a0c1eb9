//! RngSeed — seed мок-координатора.
//!
//! Слова для запроса выводятся детерминированно:
//!     word_i = H(domain || seed || request_id || i)
//! Одинаковый seed и request_id всегда дают одни и те же слова,
//! разные запросы – независимые слова.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{RandomValue, RequestId};
use crate::engine::RandomSource;

/// 32-байтовый seed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RngSeed {
    pub bytes: [u8; 32],
}

impl RngSeed {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Seed из u64 (для удобства тестов).
    pub fn from_u64(x: u64) -> Self {
        let mut b = [0u8; 32];
        b[..8].copy_from_slice(&x.to_le_bytes());
        Self { bytes: b }
    }

    /// Взять seed из источника случайности.
    pub fn from_source<R: RandomSource>(rng: &mut R) -> Self {
        Self {
            bytes: rng.next_value().0,
        }
    }

    /// Слово номер `word_index` для запроса `request_id`.
    pub fn derive_word(&self, request_id: RequestId, word_index: u32) -> RandomValue {
        let mut hasher = Sha256::new();

        hasher.update(b"RAFFLE_MOCK_VRF_V1");
        hasher.update(self.bytes);
        hasher.update(request_id.to_be_bytes());
        hasher.update(word_index.to_be_bytes());

        let hash = hasher.finalize();

        let mut out = [0u8; 32];
        out.copy_from_slice(&hash[..32]);
        RandomValue(out)
    }
}
