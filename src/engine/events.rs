use serde::{Deserialize, Serialize};

use crate::domain::{Address, RequestId, RoundEpoch};

/// Тип события розыгрыша.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RaffleEventKind {
    /// Вход принят.
    EntryAccepted { participant: Address, index: usize },

    /// Раунд закрывается, запрошена случайность.
    CloseRequested { request_id: RequestId },

    /// Победитель выбран и выплата прошла.
    WinnerPicked { winner: Address },
}

/// Событие с порядковым номером и номером раунда.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaffleEvent {
    pub index: u64,
    pub round_epoch: RoundEpoch,
    pub kind: RaffleEventKind,
}

/// Упорядоченный журнал событий для внешних мониторов и тестов.
///
/// Потребитель должен регулярно забирать события через `drain`. Если этого не
/// делать, журнал хранит только последние `MAX_EVENTS`, старые вытесняются.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaffleEventLog {
    pub events: Vec<RaffleEvent>,
    next_index: u64,
}

impl RaffleEventLog {
    pub const MAX_EVENTS: usize = 1_024;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, round_epoch: RoundEpoch, kind: RaffleEventKind) {
        let index = self.next_index;
        self.next_index += 1;
        self.events.push(RaffleEvent {
            index,
            round_epoch,
            kind,
        });

        if self.events.len() > Self::MAX_EVENTS {
            let overflow = self.events.len() - Self::MAX_EVENTS;
            self.events.drain(..overflow);
        }
    }

    /// Забрать накопленные события. Нумерация продолжается.
    pub fn drain(&mut self) -> Vec<RaffleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn last(&self) -> Option<&RaffleEvent> {
        self.events.last()
    }
}
