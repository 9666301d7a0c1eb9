use crate::domain::{Address, Amount, Round};
use crate::engine::errors::RaffleError;

/// Результат принятого входа: кто и на какой позиции.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryReceipt {
    pub participant: Address,
    pub index: usize,
}

/// Принять вход в текущий раунд.
///
/// Проверки:
/// - взнос не меньше `entry_fee` (иначе `InsufficientFee`);
/// - раунд открыт (иначе `RoundNotOpen`).
///
/// При ошибке раунд не меняется. Излишек взноса не возвращается – уходит в банк раунда.
pub fn enter(round: &mut Round, caller: Address, paid: Amount) -> Result<EntryReceipt, RaffleError> {
    if paid < round.entry_fee {
        return Err(RaffleError::InsufficientFee {
            required: round.entry_fee,
            paid,
        });
    }
    if !round.is_open() {
        return Err(RaffleError::RoundNotOpen);
    }

    let new_balance = round
        .balance
        .checked_add(paid)
        .ok_or(RaffleError::Internal("переполнение баланса раунда"))?;

    round.participants.push(caller);
    round.balance = new_balance;

    Ok(EntryReceipt {
        participant: caller,
        index: round.participants.len() - 1,
    })
}
