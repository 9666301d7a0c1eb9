use serde::{Deserialize, Serialize};

use crate::domain::{Round, Timestamp};

/// Разбивка предиката закрытия раунда по условиям.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpkeepCheck {
    /// С последнего закрытия прошло не меньше `interval_secs`.
    pub time_passed: bool,
    pub has_participants: bool,
    pub has_balance: bool,
    pub is_open: bool,
}

impl UpkeepCheck {
    /// Нужно ли закрывать раунд: все четыре условия одновременно.
    pub fn upkeep_needed(&self) -> bool {
        self.time_passed && self.has_participants && self.has_balance && self.is_open
    }
}

/// Вычислить предикат для раунда на момент `now`. Без побочных эффектов.
///
/// Если часы ушли назад (`now < last_close_timestamp`), считаем прошедшее время нулевым.
pub fn check_upkeep(round: &Round, now: Timestamp) -> UpkeepCheck {
    let elapsed = now.saturating_sub(round.last_close_timestamp);

    UpkeepCheck {
        time_passed: elapsed >= round.interval_secs,
        has_participants: !round.participants.is_empty(),
        has_balance: !round.balance.is_zero(),
        is_open: round.is_open(),
    }
}

pub fn is_eligible(round: &Round, now: Timestamp) -> bool {
    check_upkeep(round, now).upkeep_needed()
}
