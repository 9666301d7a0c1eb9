use std::collections::{HashMap, HashSet};

use crate::domain::{Address, Amount};
use crate::engine::{FundsTransfer, TransferError};

/// Простой in-memory реестр балансов для тестов и локального запуска.
///
/// Получателей можно "заблокировать": перевод им падает с `TransferError::Rejected`,
/// как у контракта-получателя, который отклоняет входящий платёж.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Address, Amount>,
    rejecting: HashSet<Address>,
    transfers: Vec<(Address, Amount)>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(Amount::ZERO)
    }

    pub fn block_recipient(&mut self, address: Address) {
        self.rejecting.insert(address);
    }

    pub fn unblock_recipient(&mut self, address: &Address) {
        self.rejecting.remove(address);
    }

    /// Все успешные переводы в порядке исполнения.
    pub fn transfers(&self) -> &[(Address, Amount)] {
        &self.transfers
    }
}

impl FundsTransfer for InMemoryLedger {
    fn transfer(&mut self, to: Address, amount: Amount) -> Result<(), TransferError> {
        if self.rejecting.contains(&to) {
            return Err(TransferError::Rejected(to));
        }

        let current = self.balance_of(&to);
        let updated = current.checked_add(amount).ok_or(TransferError::Overflow(to))?;
        self.balances.insert(to, updated);
        self.transfers.push((to, amount));
        Ok(())
    }
}
