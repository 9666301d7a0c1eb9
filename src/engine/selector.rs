use crate::domain::{Address, RandomValue};

/// Выбранный победитель раунда.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinnerSelection {
    pub winner: Address,
    pub index: usize,
}

/// Победитель = `participants[value mod participants.len()]`.
///
/// Детерминированно от входов; вся непредсказуемость – в `value`.
/// Пустой список возвращает `None` (закрытие раунда без участников невозможно).
pub fn select_winner(participants: &[Address], value: &RandomValue) -> Option<WinnerSelection> {
    if participants.is_empty() {
        return None;
    }

    let index = value.reduce(participants.len() as u64) as usize;
    participants
        .get(index)
        .map(|winner| WinnerSelection { winner: *winner, index })
}
