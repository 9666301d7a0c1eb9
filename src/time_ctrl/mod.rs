// src/time_ctrl/mod.rs
//! Контроль времени: откуда контроллер раунда берёт "сейчас".
//!
//! - `SystemClock` – реальные часы (native);
//! - `ManualClock` – часы, которыми управляет тест или dev-CLI.

pub mod clock;

#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
