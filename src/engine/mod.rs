//! Движок розыгрыша: приём входов, предикат закрытия, обмен с оракулом, выбор победителя.
//!
//! Высокоуровневый объект: `RaffleController`
//! Основные операции:
//!   - `enter` – принять вход в раунд
//!   - `begin_close` – закрыть раунд и запросить случайность
//!   - `on_randomness` – callback оракула: выбор победителя, выплата, сброс

pub mod controller;
pub mod eligibility;
pub mod entry_pool;
pub mod errors;
pub mod events;
pub mod handshake;
pub mod selector;
pub mod shared;

pub use controller::{FulfillmentOutcome, PayoutReceipt, RaffleController};
pub use eligibility::{check_upkeep, is_eligible, UpkeepCheck};
pub use entry_pool::EntryReceipt;
pub use errors::{OracleError, RaffleError, TransferError};
pub use events::{RaffleEvent, RaffleEventKind, RaffleEventLog};
pub use selector::{select_winner, WinnerSelection};
pub use shared::SharedRaffle;

use crate::domain::{Address, Amount, OracleConfig, RandomValue, RequestId};

/// Оракул случайности (внешний коллаборатор).
/// Запрос не блокирует: ответ придёт позже через `RaffleController::on_randomness`.
pub trait RandomnessOracle {
    fn request_random_words(&mut self, config: &OracleConfig) -> Result<RequestId, OracleError>;
}

/// Перевод банка победителю.
pub trait FundsTransfer {
    fn transfer(&mut self, to: Address, amount: Amount) -> Result<(), TransferError>;
}

/// Источник случайных 256-битных слов (для мок-оракула и dev-инструментов).
pub trait RandomSource {
    fn next_value(&mut self) -> RandomValue;
}
