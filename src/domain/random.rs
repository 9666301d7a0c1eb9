use core::fmt;

use serde::{Deserialize, Serialize};

/// Случайное слово фиксированной ширины (256 бит, big-endian),
/// в том виде, в каком его отдаёт VRF-координатор.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RandomValue(pub [u8; 32]);

impl RandomValue {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_u64(x: u64) -> Self {
        Self::from_u128(x as u128)
    }

    pub fn from_u128(x: u128) -> Self {
        let mut b = [0u8; 32];
        b[16..].copy_from_slice(&x.to_be_bytes());
        Self(b)
    }

    /// Точный остаток от деления всего 256-битного числа на `modulus`.
    ///
    /// Схема Горнера по байтам: r = (r * 256 + byte) mod n.
    /// r < n <= u64::MAX, поэтому r * 256 + 255 помещается в u128.
    pub fn reduce(&self, modulus: u64) -> u64 {
        if modulus == 0 {
            return 0;
        }
        let n = modulus as u128;
        let mut r: u128 = 0;
        for byte in self.0.iter() {
            r = ((r << 8) | *byte as u128) % n;
        }
        r as u64
    }
}

impl fmt::Display for RandomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
