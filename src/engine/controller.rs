// src/engine/controller.rs

use tracing::{debug, error, info, warn};

use crate::domain::{
    Address, Amount, RaffleConfig, RandomValue, RequestId, Round, RoundEpoch, RoundState,
    Timestamp,
};
use crate::engine::eligibility::{self, UpkeepCheck};
use crate::engine::entry_pool::{self, EntryReceipt};
use crate::engine::errors::RaffleError;
use crate::engine::events::{RaffleEvent, RaffleEventKind, RaffleEventLog};
use crate::engine::handshake;
use crate::engine::selector::select_winner;
use crate::engine::{FundsTransfer, RandomnessOracle};
use crate::state::RaffleSnapshot;
use crate::time_ctrl::Clock;

/// Подтверждённая выплата по итогам раунда.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayoutReceipt {
    pub request_id: RequestId,
    pub round_epoch: RoundEpoch,
    pub winner: Address,
    pub winning_index: usize,
    pub amount: Amount,
    pub closed_at: Timestamp,
}

/// Чем закончился callback оракула.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FulfillmentOutcome {
    /// Callback принят, победитель получил банк, раунд снова открыт.
    WinnerPicked(PayoutReceipt),
    /// Callback отклонён (чужой/устаревший id, пустые слова, подмена значения).
    /// Состояние раунда не менялось.
    Rejected {
        request_id: RequestId,
        reason: RaffleError,
    },
}

/// Контроллер раунда: владеет `Round` и машиной состояний Open → Calculating → Open.
///
/// Все изменения проходят через `&mut self`, для конкурентного доступа есть `SharedRaffle`.
pub struct RaffleController<O, T, C> {
    config: RaffleConfig,
    round: Round,
    oracle: O,
    transfer: T,
    clock: C,
    events: RaffleEventLog,
}

impl<O, T, C> RaffleController<O, T, C>
where
    O: RandomnessOracle,
    T: FundsTransfer,
    C: Clock,
{
    /// Создать розыгрыш. Первый раунд открывается "сейчас" по часам `clock`.
    pub fn new(config: RaffleConfig, oracle: O, transfer: T, clock: C) -> Result<Self, RaffleError> {
        config.validate()?;

        let opened_at = clock.now();
        let round = Round::new(config.entry_fee, config.interval_secs, opened_at);

        info!(
            entry_fee = %config.entry_fee,
            interval_secs = config.interval_secs,
            subscription_id = config.oracle.subscription_id,
            opened_at,
            "raffle initialised"
        );

        Ok(Self {
            config,
            round,
            oracle,
            transfer,
            clock,
            events: RaffleEventLog::new(),
        })
    }

    /// Восстановить контроллер из снапшота (например, после рестарта сервиса).
    pub fn restore(snapshot: RaffleSnapshot, oracle: O, transfer: T, clock: C) -> Result<Self, RaffleError> {
        let (config, round) = snapshot.into_parts()?;
        config.validate()?;

        info!(
            state = ?round.state,
            round_epoch = round.epoch,
            participants = round.participants.len(),
            pending = ?round.pending_request_id(),
            "raffle restored from snapshot"
        );

        Ok(Self {
            config,
            round,
            oracle,
            transfer,
            clock,
            events: RaffleEventLog::new(),
        })
    }

    pub fn snapshot(&self) -> RaffleSnapshot {
        RaffleSnapshot::from_parts(&self.config, &self.round)
    }

    // ------------------------------------------------------------------
    // Команды
    // ------------------------------------------------------------------

    /// Войти в текущий раунд.
    pub fn enter(&mut self, caller: Address, paid: Amount) -> Result<EntryReceipt, RaffleError> {
        match entry_pool::enter(&mut self.round, caller, paid) {
            Ok(receipt) => {
                self.events.push(
                    self.round.epoch,
                    RaffleEventKind::EntryAccepted {
                        participant: receipt.participant,
                        index: receipt.index,
                    },
                );
                info!(
                    participant = %receipt.participant,
                    index = receipt.index,
                    balance = %self.round.balance,
                    "entry accepted"
                );
                Ok(receipt)
            }
            Err(err) => {
                debug!(participant = %caller, paid = %paid, error = %err, "entry rejected");
                Err(err)
            }
        }
    }

    /// Предикат закрытия раунда на текущий момент (только чтение).
    pub fn check_upkeep(&self) -> UpkeepCheck {
        eligibility::check_upkeep(&self.round, self.clock.now())
    }

    pub fn is_eligible(&self) -> bool {
        self.check_upkeep().upkeep_needed()
    }

    /// Закрыть раунд: Open → Calculating + запрос случайности.
    ///
    /// Вызывается внешним триггером (keeper). Если закрывать рано – `UpkeepNotNeeded`,
    /// состояние не меняется.
    pub fn begin_close(&mut self) -> Result<RequestId, RaffleError> {
        let check = self.check_upkeep();
        if !check.upkeep_needed() {
            debug!(?check, state = ?self.round.state, "upkeep not needed");
            return Err(RaffleError::UpkeepNotNeeded {
                balance: self.round.balance,
                participants: self.round.participants.len(),
                state: self.round.state,
                check,
            });
        }

        let request_id =
            handshake::request_randomness(&mut self.round, &mut self.oracle, &self.config.oracle)?;
        self.round.state = RoundState::Calculating;

        self.events
            .push(self.round.epoch, RaffleEventKind::CloseRequested { request_id });
        info!(
            request_id,
            round_epoch = self.round.epoch,
            participants = self.round.participants.len(),
            balance = %self.round.balance,
            "close requested"
        );

        Ok(request_id)
    }

    /// Callback оракула со случайными словами.
    ///
    /// Отклонённый callback не считается ошибкой вызывающего: возвращаем
    /// `FulfillmentOutcome::Rejected` и ничего не меняем. Наружу как ошибка уходит
    /// только `PayoutFailed`: раунд остаётся в `Calculating`, запрос остаётся живым,
    /// повтор – тем же `(request_id, value)` или через `retry_payout`.
    pub fn on_randomness(
        &mut self,
        request_id: RequestId,
        random_words: &[RandomValue],
    ) -> Result<FulfillmentOutcome, RaffleError> {
        let value = match random_words.first() {
            Some(v) => *v,
            None => return Ok(self.reject(request_id, RaffleError::MissingRandomWords(request_id))),
        };

        if let Err(reason) = handshake::verify_fulfillment(&mut self.round, request_id, value) {
            return Ok(self.reject(request_id, reason));
        }

        self.settle(request_id, value).map(FulfillmentOutcome::WinnerPicked)
    }

    /// Повторить выплату с уже принятым случайным значением (операторский путь после `PayoutFailed`).
    pub fn retry_payout(&mut self) -> Result<PayoutReceipt, RaffleError> {
        let (request_id, value) =
            handshake::delivered_value(&self.round).ok_or(RaffleError::NoPendingPayout)?;

        info!(request_id, "retrying payout");
        self.settle(request_id, value)
    }

    fn reject(&self, request_id: RequestId, reason: RaffleError) -> FulfillmentOutcome {
        warn!(
            request_id,
            pending = ?self.round.pending_request_id(),
            reason = %reason,
            "randomness callback rejected"
        );
        FulfillmentOutcome::Rejected { request_id, reason }
    }

    /// Двухшаговая фиксация: выбрать победителя, перевести банк,
    /// и только после подтверждённого перевода вернуть раунд в Open.
    fn settle(&mut self, request_id: RequestId, value: RandomValue) -> Result<PayoutReceipt, RaffleError> {
        let selection = select_winner(&self.round.participants, &value)
            .ok_or(RaffleError::Internal("раунд в Calculating без участников"))?;
        let amount = self.round.balance;

        if let Err(reason) = self.transfer.transfer(selection.winner, amount) {
            error!(
                request_id,
                winner = %selection.winner,
                amount = %amount,
                reason = %reason,
                "payout failed, round stays calculating"
            );
            return Err(RaffleError::PayoutFailed {
                winner: selection.winner,
                amount,
                reason,
            });
        }

        let round_epoch = self.round.epoch;
        let closed_at = self.clock.now();
        self.round.reset_after_payout(selection.winner, closed_at);

        self.events.push(
            round_epoch,
            RaffleEventKind::WinnerPicked {
                winner: selection.winner,
            },
        );
        info!(
            request_id,
            round_epoch,
            winner = %selection.winner,
            winning_index = selection.index,
            amount = %amount,
            "winner picked"
        );

        Ok(PayoutReceipt {
            request_id,
            round_epoch,
            winner: selection.winner,
            winning_index: selection.index,
            amount,
            closed_at,
        })
    }

    // ------------------------------------------------------------------
    // Запросы (только чтение)
    // ------------------------------------------------------------------

    pub fn config(&self) -> &RaffleConfig {
        &self.config
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn state(&self) -> RoundState {
        self.round.state
    }

    pub fn entry_fee(&self) -> Amount {
        self.round.entry_fee
    }

    pub fn interval_secs(&self) -> u64 {
        self.round.interval_secs
    }

    pub fn participants(&self) -> &[Address] {
        &self.round.participants
    }

    pub fn participant(&self, index: usize) -> Result<Address, RaffleError> {
        self.round
            .participant(index)
            .ok_or(RaffleError::ParticipantNotFound(index))
    }

    pub fn number_of_participants(&self) -> usize {
        self.round.number_of_participants()
    }

    pub fn last_close_timestamp(&self) -> Timestamp {
        self.round.last_close_timestamp
    }

    pub fn recent_winner(&self) -> Option<Address> {
        self.round.recent_winner
    }

    pub fn balance(&self) -> Amount {
        self.round.balance
    }

    pub fn pending_request_id(&self) -> Option<RequestId> {
        self.round.pending_request_id()
    }

    pub fn request_confirmations(&self) -> u16 {
        self.config.oracle.request_confirmations
    }

    pub fn num_words(&self) -> u32 {
        self.config.oracle.num_words
    }

    pub fn events(&self) -> &[RaffleEvent] {
        &self.events.events
    }

    pub fn take_events(&mut self) -> Vec<RaffleEvent> {
        self.events.drain()
    }

    // ------------------------------------------------------------------
    // Доступ к коллабораторам
    // ------------------------------------------------------------------

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    pub fn transfer_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
