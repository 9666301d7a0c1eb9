use core::fmt;

use serde::{Deserialize, Serialize};

/// 20-байтовый адрес участника (как у EVM-аккаунтов).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Адрес из u64 в младших байтах (удобно для тестов и dev-CLI).
    pub fn from_low_u64(x: u64) -> Self {
        let mut b = [0u8; 20];
        b[12..].copy_from_slice(&x.to_be_bytes());
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
