// src/infra/oracle.rs

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::domain::{KeyHash, OracleConfig, RandomValue, RequestId};
use crate::engine::{OracleError, RandomnessOracle};
use crate::infra::ids::IdGenerator;
use crate::infra::rng_seed::RngSeed;

/// Подписка на оракул: из её баланса оплачиваются запросы.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub id: u64,
    pub balance: u128,
}

/// Запрос, который координатор ещё не исполнил.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingVrfRequest {
    pub request_id: RequestId,
    pub subscription_id: u64,
    pub key_hash: KeyHash,
    pub num_words: u32,
    pub callback_gas_limit: u32,
}

/// То, что координатор доставляет потребителю в callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fulfillment {
    pub request_id: RequestId,
    pub random_words: Vec<RandomValue>,
}

/// Мок VRF-координатора для dev-сетей и тестов.
///
/// - request id выдаются по порядку, начиная с 1;
/// - запрос требует существующую и пополненную подписку;
/// - `fulfill` выводит слова из seed и request id;
/// - исполнение неизвестного запроса – `nonexistent request`.
#[derive(Debug)]
pub struct MockVrfCoordinator {
    ids: IdGenerator,
    seed: RngSeed,
    subscriptions: HashMap<u64, Subscription>,
    pending: BTreeMap<RequestId, PendingVrfRequest>,
    unavailable: bool,
}

impl MockVrfCoordinator {
    pub fn new(seed: RngSeed) -> Self {
        Self {
            ids: IdGenerator::new(),
            seed,
            subscriptions: HashMap::new(),
            pending: BTreeMap::new(),
            unavailable: false,
        }
    }

    /// Координатор с одной уже пополненной подпиской (id = 1), как на локальной сети.
    pub fn with_funded_subscription(seed: RngSeed, amount: u128) -> Self {
        let mut coordinator = Self::new(seed);
        let sub_id = coordinator.create_subscription();
        // Только что созданная подписка существует, пополнение не может упасть.
        if let Some(sub) = coordinator.subscriptions.get_mut(&sub_id) {
            sub.balance = amount;
        }
        coordinator
    }

    pub fn create_subscription(&mut self) -> u64 {
        let id = self.ids.next_subscription_id();
        self.subscriptions.insert(id, Subscription { id, balance: 0 });
        id
    }

    pub fn fund_subscription(&mut self, subscription_id: u64, amount: u128) -> Result<(), OracleError> {
        let sub = self
            .subscriptions
            .get_mut(&subscription_id)
            .ok_or(OracleError::InvalidSubscription(subscription_id))?;
        sub.balance = sub.balance.saturating_add(amount);
        Ok(())
    }

    pub fn subscription(&self, subscription_id: u64) -> Option<&Subscription> {
        self.subscriptions.get(&subscription_id)
    }

    /// Симулировать недоступность оракула.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn is_pending(&self, request_id: RequestId) -> bool {
        self.pending.contains_key(&request_id)
    }

    pub fn pending_requests(&self) -> impl Iterator<Item = &PendingVrfRequest> {
        self.pending.values()
    }

    /// Исполнить запрос: слова выводятся из seed.
    pub fn fulfill(&mut self, request_id: RequestId) -> Result<Fulfillment, OracleError> {
        let request = self
            .pending
            .remove(&request_id)
            .ok_or(OracleError::NonexistentRequest(request_id))?;

        let random_words = (0..request.num_words)
            .map(|i| self.seed.derive_word(request_id, i))
            .collect();

        debug!(request_id, num_words = request.num_words, "mock vrf fulfilled");
        Ok(Fulfillment {
            request_id,
            random_words,
        })
    }

    /// Исполнить запрос с заданными словами (для сценариев с конкретным значением).
    pub fn fulfill_with_words(
        &mut self,
        request_id: RequestId,
        random_words: Vec<RandomValue>,
    ) -> Result<Fulfillment, OracleError> {
        self.pending
            .remove(&request_id)
            .ok_or(OracleError::NonexistentRequest(request_id))?;

        debug!(request_id, num_words = random_words.len(), "mock vrf fulfilled with override");
        Ok(Fulfillment {
            request_id,
            random_words,
        })
    }
}

impl RandomnessOracle for MockVrfCoordinator {
    fn request_random_words(&mut self, config: &OracleConfig) -> Result<RequestId, OracleError> {
        if self.unavailable {
            return Err(OracleError::Unavailable("mock coordinator offline".into()));
        }

        let sub = self
            .subscriptions
            .get(&config.subscription_id)
            .ok_or(OracleError::InvalidSubscription(config.subscription_id))?;
        if sub.balance == 0 {
            return Err(OracleError::InsufficientSubscriptionBalance(sub.id));
        }

        let request_id = self.ids.next_request_id();
        self.pending.insert(
            request_id,
            PendingVrfRequest {
                request_id,
                subscription_id: config.subscription_id,
                key_hash: config.key_hash,
                num_words: config.num_words,
                callback_gas_limit: config.callback_gas_limit,
            },
        );

        debug!(request_id, subscription_id = config.subscription_id, "mock vrf request queued");
        Ok(request_id)
    }
}
