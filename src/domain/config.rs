// src/domain/config.rs

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::amount::Amount;

/// Ошибки конфигурации розыгрыша.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Некорректный key hash: {0}")]
    InvalidKeyHash(String),

    #[error("Неизвестная сеть: {0}")]
    UnknownNetwork(String),

    #[error("Некорректная конфигурация: {0}")]
    Invalid(String),
}

/// Key hash ("gas lane") VRF-координатора: определяет максимальную цену газа callback'а.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyHash(pub [u8; 32]);

impl KeyHash {
    /// Разобрать hex-строку (с префиксом `0x` или без).
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let raw = s.trim();
        let raw = raw.strip_prefix("0x").unwrap_or(raw);
        if raw.len() != 64 || !raw.is_ascii() {
            return Err(ConfigError::InvalidKeyHash(s.to_string()));
        }

        let mut out = [0u8; 32];
        for (i, chunk) in raw.as_bytes().chunks(2).enumerate() {
            let pair = core::str::from_utf8(chunk)
                .map_err(|_| ConfigError::InvalidKeyHash(s.to_string()))?;
            out[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| ConfigError::InvalidKeyHash(s.to_string()))?;
        }
        Ok(Self(out))
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Параметры подключения к оракулу случайности.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OracleConfig {
    pub key_hash: KeyHash,
    pub subscription_id: u64,
    /// Лимит газа на callback.
    pub callback_gas_limit: u32,
    /// Сколько подтверждений блока ждёт оракул перед ответом.
    pub request_confirmations: u16,
    /// Сколько случайных слов запрашиваем (для выбора победителя нужно одно).
    pub num_words: u32,
}

impl OracleConfig {
    pub const MIN_REQUEST_CONFIRMATIONS: u16 = 3;
    pub const MAX_REQUEST_CONFIRMATIONS: u16 = 200;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_words == 0 {
            return Err(ConfigError::Invalid("OracleConfig: num_words = 0".into()));
        }
        if self.callback_gas_limit == 0 {
            return Err(ConfigError::Invalid(
                "OracleConfig: callback_gas_limit = 0".into(),
            ));
        }
        if !(Self::MIN_REQUEST_CONFIRMATIONS..=Self::MAX_REQUEST_CONFIRMATIONS)
            .contains(&self.request_confirmations)
        {
            return Err(ConfigError::Invalid(format!(
                "OracleConfig: request_confirmations = {} вне диапазона {}..={}",
                self.request_confirmations,
                Self::MIN_REQUEST_CONFIRMATIONS,
                Self::MAX_REQUEST_CONFIRMATIONS
            )));
        }
        Ok(())
    }
}

/// Конфигурация розыгрыша. Задаётся при создании и дальше не меняется.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaffleConfig {
    /// Взнос за одно место в раунде.
    pub entry_fee: Amount,
    /// Минимальный интервал между закрытиями раундов, в секундах.
    pub interval_secs: u64,
    pub oracle: OracleConfig,
}

impl RaffleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.oracle.validate()
    }

    /// Конфиг из пресета сети.
    pub fn for_network(network: NetworkPreset) -> Self {
        network.raffle_config()
    }
}

/// Известные сети с готовыми параметрами.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum NetworkPreset {
    /// Локальная dev-сеть: интервал 0, мок-координатор.
    Local,
    /// Тестнет Rinkeby (chain id 4).
    Rinkeby,
}

/// Gas lane 30 gwei.
const GAS_LANE_30_GWEI: [u8; 32] = [
    0xd8, 0x9b, 0x2b, 0xf1, 0x50, 0xe3, 0xb9, 0xe1, 0x34, 0x46, 0x98, 0x6e, 0x57, 0x1f, 0xb9,
    0xca, 0xb2, 0x4b, 0x13, 0xce, 0xa0, 0xa4, 0x3e, 0xa2, 0x0a, 0x60, 0x49, 0xa8, 0x5c, 0xc8,
    0x07, 0xcc,
];

impl NetworkPreset {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_lowercase().as_str() {
            "local" | "hardhat" | "localhost" => Ok(NetworkPreset::Local),
            "rinkeby" => Ok(NetworkPreset::Rinkeby),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }

    pub fn chain_id(self) -> u64 {
        match self {
            NetworkPreset::Local => 31337,
            NetworkPreset::Rinkeby => 4,
        }
    }

    /// Локальные сети – dev-цепочки, на них оракул подменяется мок-координатором.
    pub fn is_development(self) -> bool {
        matches!(self, NetworkPreset::Local)
    }

    pub fn raffle_config(self) -> RaffleConfig {
        let oracle = OracleConfig {
            key_hash: KeyHash(GAS_LANE_30_GWEI),
            subscription_id: match self {
                NetworkPreset::Local => 1,
                NetworkPreset::Rinkeby => 16839,
            },
            callback_gas_limit: 500_000,
            request_confirmations: OracleConfig::MIN_REQUEST_CONFIRMATIONS,
            num_words: 1,
        };

        RaffleConfig {
            entry_fee: Amount::from_milli_ether(10),
            interval_secs: match self {
                NetworkPreset::Local => 0,
                NetworkPreset::Rinkeby => 30,
            },
            oracle,
        }
    }
}
