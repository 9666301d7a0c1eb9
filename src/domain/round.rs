// src/domain/round.rs

use serde::{Deserialize, Serialize};

use crate::domain::address::Address;
use crate::domain::amount::Amount;
use crate::domain::random::RandomValue;
use crate::domain::{RequestId, RoundEpoch, Timestamp};

/// Состояние раунда.
#[cfg_attr(not(target_arch = "wasm32"), derive(async_graphql::Enum))]
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoundState {
    /// Раунд открыт – принимаем входы.
    #[default]
    Open,
    /// Запрошена случайность, ждём callback от оракула.
    Calculating,
}

impl RoundState {
    /// Числовой код состояния (0 = Open, 1 = Calculating) для внешних инструментов.
    pub fn code(self) -> u8 {
        match self {
            RoundState::Open => 0,
            RoundState::Calculating => 1,
        }
    }
}

/// Корреляционная запись запроса случайности.
///
/// Живёт с момента запроса до успешной выплаты. Одновременно существует не более одной.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RandomnessRequest {
    pub request_id: RequestId,
    /// Номер раунда, для которого выпущен запрос.
    pub round_epoch: RoundEpoch,
    /// Значение, принятое первым валидным callback'ом.
    /// Повторная попытка выплаты возможна только с ним же.
    pub delivered_value: Option<RandomValue>,
}

impl RandomnessRequest {
    pub fn new(request_id: RequestId, round_epoch: RoundEpoch) -> Self {
        Self {
            request_id,
            round_epoch,
            delivered_value: None,
        }
    }
}

/// Текущий раунд розыгрыша. Единственный экземпляр, владеет им `RaffleController`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Round {
    pub state: RoundState,
    pub entry_fee: Amount,
    /// Минимальная длительность раунда в секундах.
    pub interval_secs: u64,
    pub last_close_timestamp: Timestamp,
    /// Участники в порядке входа. Дубликаты разрешены: каждый вход – отдельный шанс.
    pub participants: Vec<Address>,
    /// Сумма взносов текущего раунда.
    pub balance: Amount,
    pub pending_request: Option<RandomnessRequest>,
    pub recent_winner: Option<Address>,
    /// Сколько раундов уже завершено выплатой.
    pub epoch: RoundEpoch,
}

impl Round {
    /// Новый открытый раунд. `opened_at` становится точкой отсчёта интервала.
    pub fn new(entry_fee: Amount, interval_secs: u64, opened_at: Timestamp) -> Self {
        Self {
            state: RoundState::Open,
            entry_fee,
            interval_secs,
            last_close_timestamp: opened_at,
            participants: Vec::new(),
            balance: Amount::ZERO,
            pending_request: None,
            recent_winner: None,
            epoch: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == RoundState::Open
    }

    pub fn number_of_participants(&self) -> usize {
        self.participants.len()
    }

    pub fn participant(&self, index: usize) -> Option<Address> {
        self.participants.get(index).copied()
    }

    pub fn pending_request_id(&self) -> Option<RequestId> {
        self.pending_request.as_ref().map(|r| r.request_id)
    }

    /// Сброс после подтверждённой выплаты.
    pub fn reset_after_payout(&mut self, winner: Address, closed_at: Timestamp) {
        self.recent_winner = Some(winner);
        self.participants.clear();
        self.balance = Amount::ZERO;
        self.last_close_timestamp = closed_at;
        self.pending_request = None;
        self.state = RoundState::Open;
        self.epoch += 1;
    }
}
