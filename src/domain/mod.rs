//! Доменная модель розыгрыша: адреса, суммы, случайные слова, раунд, конфиг.

pub mod address;
pub mod amount;
pub mod config;
pub mod random;
pub mod round;

// Базовые идентификаторы
pub type RequestId = u64;
pub type RoundEpoch = u64;
/// Unix timestamp в секундах.
pub type Timestamp = u64;

pub use address::*;
pub use amount::*;
pub use config::*;
pub use random::*;
pub use round::*;
