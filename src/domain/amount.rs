use core::fmt;
use core::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Количество средств в минимальных единицах (wei).
/// Обёртка над u128, чтобы не путать с индексами и таймстемпами.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// 1 ether = 10^18 wei.
    pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

    pub fn new(wei: u128) -> Self {
        Amount(wei)
    }

    /// Сумма в "тысячных" эфира: `from_milli_ether(10)` = 0.01 ETH.
    pub fn from_milli_ether(milli: u128) -> Self {
        Amount(milli.saturating_mul(Self::WEI_PER_ETHER / 1_000))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// `fee * count` – сколько должен составлять баланс раунда при точной оплате.
    pub fn checked_mul_count(self, count: usize) -> Option<Amount> {
        self.0.checked_mul(count as u128).map(Amount)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}
