use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, RequestId, RoundEpoch, RoundState, Timestamp};
use crate::engine::UpkeepCheck;

/// DTO текущего раунда.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundViewDto {
    pub state: RoundState,
    /// Числовой код состояния: 0 = Open, 1 = Calculating.
    pub state_code: u8,
    pub round_epoch: RoundEpoch,
    pub entry_fee: Amount,
    pub interval_secs: u64,
    pub last_close_timestamp: Timestamp,
    pub participants: Vec<Address>,
    pub balance: Amount,
    pub recent_winner: Option<Address>,
    pub pending_request_id: Option<RequestId>,
    pub request_confirmations: u16,
    pub num_words: u32,
}

/// DTO проверки "нужно ли закрывать раунд".
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpkeepViewDto {
    pub upkeep_needed: bool,
    pub time_passed: bool,
    pub has_participants: bool,
    pub has_balance: bool,
    pub is_open: bool,
}

impl From<UpkeepCheck> for UpkeepViewDto {
    fn from(check: UpkeepCheck) -> Self {
        Self {
            upkeep_needed: check.upkeep_needed(),
            time_passed: check.time_passed,
            has_participants: check.has_participants,
            has_balance: check.has_balance,
            is_open: check.is_open,
        }
    }
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandResponse {
    /// Вход принят.
    Entered { participant: Address, index: usize },

    /// Раунд закрывается, ждём оракул.
    CloseRequested { request_id: RequestId },

    /// Победитель выбран, банк выплачен.
    WinnerPicked {
        request_id: RequestId,
        winner: Address,
        winning_index: usize,
        amount: Amount,
    },

    /// Callback отклонён, состояние не менялось.
    CallbackRejected { request_id: RequestId, reason: String },
}
