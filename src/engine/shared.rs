// src/engine/shared.rs

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{Address, Amount, RandomValue, RequestId};
use crate::engine::controller::{FulfillmentOutcome, PayoutReceipt, RaffleController};
use crate::engine::eligibility::UpkeepCheck;
use crate::engine::entry_pool::EntryReceipt;
use crate::engine::errors::RaffleError;
use crate::engine::events::RaffleEvent;
use crate::engine::{FundsTransfer, RandomnessOracle};
use crate::time_ctrl::Clock;

/// Разделяемый хэндл на контроллер: единственный писатель под мьютексом.
///
/// `enter`, `begin_close` и `on_randomness` держат блокировку на всё время операции,
/// поэтому вход, пришедший одновременно с закрытием, либо успевает целиком до него,
/// либо получает `RoundNotOpen` после.
pub struct SharedRaffle<O, T, C> {
    inner: Arc<Mutex<RaffleController<O, T, C>>>,
}

impl<O, T, C> Clone for SharedRaffle<O, T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O, T, C> SharedRaffle<O, T, C>
where
    O: RandomnessOracle,
    T: FundsTransfer,
    C: Clock,
{
    pub fn new(controller: RaffleController<O, T, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RaffleController<O, T, C>>, RaffleError> {
        self.inner
            .lock()
            .map_err(|_| RaffleError::Internal("мьютекс розыгрыша отравлен"))
    }

    pub fn enter(&self, caller: Address, paid: Amount) -> Result<EntryReceipt, RaffleError> {
        self.lock()?.enter(caller, paid)
    }

    pub fn check_upkeep(&self) -> Result<UpkeepCheck, RaffleError> {
        Ok(self.lock()?.check_upkeep())
    }

    pub fn begin_close(&self) -> Result<RequestId, RaffleError> {
        self.lock()?.begin_close()
    }

    pub fn on_randomness(
        &self,
        request_id: RequestId,
        random_words: &[RandomValue],
    ) -> Result<FulfillmentOutcome, RaffleError> {
        self.lock()?.on_randomness(request_id, random_words)
    }

    pub fn retry_payout(&self) -> Result<PayoutReceipt, RaffleError> {
        self.lock()?.retry_payout()
    }

    /// Забрать накопленные события.
    pub fn take_events(&self) -> Result<Vec<RaffleEvent>, RaffleError> {
        Ok(self.lock()?.take_events())
    }

    /// Выполнить чтение (или операторское действие) под блокировкой.
    pub fn with<R>(&self, f: impl FnOnce(&mut RaffleController<O, T, C>) -> R) -> Result<R, RaffleError> {
        let mut guard = self.lock()?;
        Ok(f(&mut *guard))
    }
}
