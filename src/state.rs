use linera_sdk::views::{linera_views, MapView, RegisterView, RootView, ViewStorageContext};
use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, RaffleConfig, Round, RoundEpoch, RoundState, Timestamp};
use crate::engine::controller::PayoutReceipt;
use crate::engine::errors::RaffleError;

/// Снэпшот розыгрыша, который можно хранить во View или во внешнем хранилище.
/// Всё, что нужно, чтобы восстановить `RaffleController` (кроме коллабораторов).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaffleSnapshot {
    pub config: RaffleConfig,
    pub round: Round,
}

impl RaffleSnapshot {
    pub fn from_parts(config: &RaffleConfig, round: &Round) -> Self {
        Self {
            config: config.clone(),
            round: round.clone(),
        }
    }

    /// Развернуть снапшот, проверив инварианты раунда.
    ///
    /// Битый снапшот (например, Calculating без ожидающего запроса) не восстанавливаем.
    pub fn into_parts(self) -> Result<(RaffleConfig, Round), RaffleError> {
        let round = &self.round;

        let open = round.state == RoundState::Open;
        if open == round.pending_request.is_some() {
            return Err(RaffleError::Internal(
                "снапшот: состояние раунда не согласовано с ожидающим запросом",
            ));
        }
        if let Some(pending) = &round.pending_request {
            if pending.round_epoch != round.epoch {
                return Err(RaffleError::Internal(
                    "снапшот: ожидающий запрос выпущен для другого раунда",
                ));
            }
        }
        if round.state == RoundState::Calculating && round.participants.is_empty() {
            return Err(RaffleError::Internal("снапшот: Calculating без участников"));
        }
        if round.entry_fee != self.config.entry_fee || round.interval_secs != self.config.interval_secs {
            return Err(RaffleError::Internal("снапшот: раунд не совпадает с конфигом"));
        }

        Ok((self.config, self.round))
    }
}

/// Запись о завершённом раунде.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinnerRecord {
    pub round_epoch: RoundEpoch,
    pub winner: Address,
    pub winning_index: usize,
    pub amount: Amount,
    pub closed_at: Timestamp,
}

impl WinnerRecord {
    pub fn from_receipt(receipt: &PayoutReceipt) -> Self {
        Self {
            round_epoch: receipt.round_epoch,
            winner: receipt.winner,
            winning_index: receipt.winning_index,
            amount: receipt.amount,
            closed_at: receipt.closed_at,
        }
    }
}

/// Состояние приложения розыгрыша на Linera.
#[derive(RootView)]
#[view(context = ViewStorageContext)]
pub struct RaffleState {
    /// Текущий розыгрыш (None до инициализации).
    pub raffle: RegisterView<Option<RaffleSnapshot>>,

    /// Сколько раундов завершено выплатой (для статистики / мониторинга).
    pub rounds_completed: RegisterView<u64>,

    /// История победителей: номер раунда -> запись.
    pub winners: MapView<RoundEpoch, WinnerRecord>,
}
