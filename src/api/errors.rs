use serde::{Deserialize, Serialize};

use crate::domain::Amount;
use crate::engine::RaffleError;

/// Ошибки внешнего API (то, что отдаём фронту / клиенту / keeper'у).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    BadRequest(String),

    /// Взнос меньше требуемого.
    InsufficientFee { required: Amount, paid: Amount },

    /// Команда не может быть выполнена в текущем состоянии раунда
    /// (раунд закрыт, закрывать рано, нет выплаты для повтора).
    InvalidCommand(String),

    /// Участник с таким индексом не найден.
    ParticipantNotFound(usize),

    /// Выплата не прошла, раунд ждёт повтора.
    PayoutFailed(String),

    /// Прочие ошибки движка.
    EngineError(String),

    /// Внутренняя ошибка сервера.
    Internal(String),
}

impl From<RaffleError> for ApiError {
    fn from(err: RaffleError) -> Self {
        match err {
            RaffleError::InsufficientFee { required, paid } => {
                ApiError::InsufficientFee { required, paid }
            }
            RaffleError::RoundNotOpen
            | RaffleError::UpkeepNotNeeded { .. }
            | RaffleError::RequestAlreadyPending(_)
            | RaffleError::NoPendingPayout => ApiError::InvalidCommand(err.to_string()),
            RaffleError::ParticipantNotFound(index) => ApiError::ParticipantNotFound(index),
            RaffleError::PayoutFailed { .. } => ApiError::PayoutFailed(err.to_string()),
            RaffleError::Internal(msg) => ApiError::Internal(msg.to_string()),
            other => ApiError::EngineError(other.to_string()),
        }
    }
}
