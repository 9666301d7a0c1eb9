use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, RandomValue, RequestId};

/// Команда верхнего уровня.
///
/// Эти команды превращаются в операции (`RaffleOperation`),
/// которые Linera экспонирует наружу в виде GraphQL mutations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Command {
    /// Войти в текущий раунд, заплатив взнос.
    Enter(EnterCommand),

    /// Закрыть раунд и запросить случайность.
    ///
    /// Дёргается внешним keeper'ом, когда `CheckUpkeep` вернул true.
    PerformUpkeep,

    /// Callback оракула со случайными словами.
    FulfillRandomWords(FulfillRandomWordsCommand),

    /// Повторить выплату после `PayoutFailed` с уже принятым значением.
    RetryPayout,
}

/// Вход в раунд.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnterCommand {
    pub caller: Address,
    /// Сколько заплачено вместе с входом.
    pub paid: Amount,
}

/// Доставка случайных слов от оракула.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FulfillRandomWordsCommand {
    pub request_id: RequestId,
    pub random_words: Vec<RandomValue>,
}
