//! Главный модуль приложения Raffle на Linera.
//!
//! Здесь описываем ABI (Operation / Message / Query / Response) и
//! связываем contract/service с нашим RaffleState.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod state;
pub mod time_ctrl;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

use linera_sdk::linera_base_types::{ContractAbi, ServiceAbi};
use serde::{Deserialize, Serialize};

use crate::api::{Command, Query, QueryResponse};
use crate::state::RaffleState;

/// Операции (внешние команды), которые модуль принимает.
///
/// Одна операция = одна команда из api::Command.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RaffleOperation {
    Command(Command),
}

/// Сообщения между приложениями Linera. Пока не нужны.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RaffleMessage {}

/// Запросы к сервису (read-only).
pub type RaffleQuery = Query;

/// Ответы на запросы.
pub type RaffleResponse = QueryResponse;

/// ABI для контракта и сервиса.
#[derive(Clone, Debug)]
pub struct RaffleAbi;

impl ContractAbi for RaffleAbi {
    type Operation = RaffleOperation;
    type Response = ();
}

impl ServiceAbi for RaffleAbi {
    type Query = RaffleQuery;
    type QueryResponse = RaffleResponse;
}

/// Экспортируем тип состояния для contract.rs и service.rs.
pub type Storage = RaffleState;
