use serde::{Deserialize, Serialize};

use crate::domain::{Address, OracleConfig, Round};
use crate::engine::RaffleEvent;

use super::dto::{RoundViewDto, UpkeepViewDto};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Query {
    /// Полное состояние текущего раунда.
    GetRound,

    /// Участник по индексу входа.
    GetParticipant { index: usize },

    /// Нужно ли сейчас закрывать раунд (для keeper'а).
    CheckUpkeep,

    /// Последний победитель.
    GetRecentWinner,

    /// Накопленные события.
    GetEvents,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueryResponse {
    Round(RoundViewDto),
    Participant(Address),
    Upkeep(UpkeepViewDto),
    RecentWinner(Option<Address>),
    Events(Vec<RaffleEvent>),
}

/// Сформировать DTO раунда.
pub fn build_round_view(round: &Round, oracle: &OracleConfig) -> RoundViewDto {
    RoundViewDto {
        state: round.state,
        state_code: round.state.code(),
        round_epoch: round.epoch,
        entry_fee: round.entry_fee,
        interval_secs: round.interval_secs,
        last_close_timestamp: round.last_close_timestamp,
        participants: round.participants.clone(),
        balance: round.balance,
        recent_winner: round.recent_winner,
        pending_request_id: round.pending_request_id(),
        request_confirmations: oracle.request_confirmations,
        num_words: oracle.num_words,
    }
}
