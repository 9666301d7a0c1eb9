//! RNG-реализации для native-сборки (модуль подключается только вне wasm32):
//! в контракте своей случайности нет, она приходит только от оракула.

use crate::domain::RandomValue;
use crate::engine::RandomSource;

#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn next_value(&mut self) -> RandomValue {
        use rand::RngCore;

        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        RandomValue(bytes)
    }
}

/// Детерминированный RNG для тестов и реплея.
/// Одинаковый seed → одинаковая последовательность слов.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: rand::rngs::StdRng,
}

impl DeterministicRng {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        use rand::SeedableRng;
        Self {
            inner: rand::rngs::StdRng::from_seed(seed),
        }
    }

    pub fn seed_from_u64(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            inner: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn next_value(&mut self) -> RandomValue {
        use rand::RngCore;

        let mut bytes = [0u8; 32];
        self.inner.fill_bytes(&mut bytes);
        RandomValue(bytes)
    }
}
