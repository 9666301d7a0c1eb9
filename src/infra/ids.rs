use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::RequestId;

/// Генерация ID на основе монотонных счётчиков.
/// Используется мок-координатором и оффчейн-инструментами; начинаем с 1,
/// id = 0 никогда не выдаётся.
#[derive(Debug)]
pub struct IdGenerator {
    request_counter: AtomicU64,
    subscription_counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            request_counter: AtomicU64::new(1),
            subscription_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_request_id(&self) -> RequestId {
        self.request_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_subscription_id(&self) -> u64 {
        self.subscription_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
