use thiserror::Error;

use crate::domain::{Address, Amount, ConfigError, RequestId, RoundState};
use crate::engine::eligibility::UpkeepCheck;

/// Ошибки движка розыгрыша.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RaffleError {
    #[error("Недостаточный взнос: нужно {required}, передано {paid}")]
    InsufficientFee { required: Amount, paid: Amount },

    #[error("Раунд не открыт для входа")]
    RoundNotOpen,

    #[error(
        "Закрытие раунда не требуется: balance={balance}, participants={participants}, state={state:?}"
    )]
    UpkeepNotNeeded {
        balance: Amount,
        participants: usize,
        state: RoundState,
        check: UpkeepCheck,
    },

    #[error("Запрос случайности {0} уже ожидает ответа")]
    RequestAlreadyPending(RequestId),

    #[error("Неизвестный request id {0}")]
    UnknownRequestId(RequestId),

    #[error("Для запроса {request_id} уже принято другое случайное значение")]
    RandomnessMismatch { request_id: RequestId },

    #[error("Callback для запроса {0} не содержит случайных слов")]
    MissingRandomWords(RequestId),

    #[error("Нет выплаты, ожидающей повтора")]
    NoPendingPayout,

    #[error("Выплата {amount} победителю {winner} не прошла: {reason}")]
    PayoutFailed {
        winner: Address,
        amount: Amount,
        reason: TransferError,
    },

    #[error("Участник с индексом {0} не найден")]
    ParticipantNotFound(usize),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("Ошибка оракула: {0}")]
    Oracle(#[from] OracleError),

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}

/// Ошибки оракула случайности (внешний коллаборатор).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("nonexistent request {0}")]
    NonexistentRequest(RequestId),

    #[error("Подписка {0} не найдена")]
    InvalidSubscription(u64),

    #[error("На подписке {0} недостаточно средств")]
    InsufficientSubscriptionBalance(u64),

    #[error("Оракул недоступен: {0}")]
    Unavailable(String),
}

/// Ошибки перевода средств при выплате.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("получатель {0} отклонил перевод")]
    Rejected(Address),

    #[error("переполнение баланса получателя {0}")]
    Overflow(Address),

    #[error("{0}")]
    Other(String),
}
