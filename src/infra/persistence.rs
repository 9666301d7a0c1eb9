use std::collections::BTreeMap;

use crate::domain::RoundEpoch;
use crate::state::{RaffleSnapshot, WinnerRecord};

/// Абстракция хранилища розыгрыша.
///
/// В Linera-режиме вместо этого используется `RaffleState` и Views,
/// но эта абстракция удобна:
/// - для тестов контроллера с рестартом,
/// - для оффчейн-сервисов (dev-CLI, keeper-симуляции).
pub trait RaffleStorage {
    /// Загрузить последний снапшот.
    fn load_snapshot(&self) -> Option<RaffleSnapshot>;

    /// Сохранить снапшот.
    fn save_snapshot(&mut self, snapshot: &RaffleSnapshot);

    /// Записать победителя раунда.
    fn record_winner(&mut self, record: WinnerRecord);

    /// Победитель конкретного раунда.
    fn winner(&self, round_epoch: RoundEpoch) -> Option<WinnerRecord>;

    /// Сколько раундов завершено.
    fn rounds_completed(&self) -> u64;
}

/// In-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryRaffleStorage {
    snapshot: Option<RaffleSnapshot>,
    winners: BTreeMap<RoundEpoch, WinnerRecord>,
}

impl InMemoryRaffleStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn winners(&self) -> impl Iterator<Item = &WinnerRecord> {
        self.winners.values()
    }
}

impl RaffleStorage for InMemoryRaffleStorage {
    fn load_snapshot(&self) -> Option<RaffleSnapshot> {
        self.snapshot.clone()
    }

    fn save_snapshot(&mut self, snapshot: &RaffleSnapshot) {
        self.snapshot = Some(snapshot.clone());
    }

    fn record_winner(&mut self, record: WinnerRecord) {
        self.winners.insert(record.round_epoch, record);
    }

    fn winner(&self, round_epoch: RoundEpoch) -> Option<WinnerRecord> {
        self.winners.get(&round_epoch).cloned()
    }

    fn rounds_completed(&self) -> u64 {
        self.winners.len() as u64
    }
}
