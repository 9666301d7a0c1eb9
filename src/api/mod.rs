//! Внешний API розыгрыша.
//!
//! Здесь описываются:
//! - команды (commands.rs) — всё, что меняет состояние (вход, закрытие раунда, callback оракула);
//! - запросы (queries.rs) — только чтение;
//! - DTO (dto.rs) — удобные структуры для фронта и keeper'а;
//! - ошибки (errors.rs) — то, что видит клиент;
//! - исполнение (handler.rs) — команды и запросы поверх контроллера.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod handler;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use handler::*;
pub use queries::*;
