use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::domain::{Amount, KeyHash, NetworkPreset, RaffleConfig};

/// Конфигурация процесса (dev-CLI, оффчейн-сервисы): сеть, параметры розыгрыша, логи.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub network: NetworkPreset,
    pub raffle: RaffleConfig,

    pub log_level: String,
    pub log_format: String,
    pub log_color: bool,

    /// Сколько участников входит в каждый симулируемый раунд.
    pub dev_participants: u64,
    /// Сколько раундов прогнать.
    pub dev_rounds: u64,
    /// Seed мок-координатора; без него берётся системная случайность.
    pub dev_seed: Option<u64>,
}

/// Загрузить конфиг из окружения (и `.env`, если он есть).
pub fn load() -> Result<RuntimeConfig> {
    let _ = dotenvy::dotenv();
    from_lookup(|key| env::var(key).ok())
}

/// Собрать конфиг из произвольного источника переменных.
///
/// Пресет сети задаёт значения по умолчанию, отдельные переменные их переопределяют.
pub fn from_lookup<F>(lookup: F) -> Result<RuntimeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let network = match lookup("RAFFLE_NETWORK") {
        Some(name) => NetworkPreset::parse(&name).context("RAFFLE_NETWORK")?,
        None => NetworkPreset::Local,
    };

    let mut raffle = network.raffle_config();

    if let Some(fee) = parse_var::<u128, _>(&lookup, "ENTRY_FEE_WEI")? {
        raffle.entry_fee = Amount::new(fee);
    }
    if let Some(interval) = parse_var::<u64, _>(&lookup, "INTERVAL_SECS")? {
        raffle.interval_secs = interval;
    }
    if let Some(sub_id) = parse_var::<u64, _>(&lookup, "SUBSCRIPTION_ID")? {
        raffle.oracle.subscription_id = sub_id;
    }
    if let Some(raw) = lookup("KEY_HASH") {
        raffle.oracle.key_hash = KeyHash::from_hex(&raw).context("KEY_HASH")?;
    }
    if let Some(limit) = parse_var::<u32, _>(&lookup, "CALLBACK_GAS_LIMIT")? {
        raffle.oracle.callback_gas_limit = limit;
    }
    if let Some(confirmations) = parse_var::<u16, _>(&lookup, "REQUEST_CONFIRMATIONS")? {
        raffle.oracle.request_confirmations = confirmations;
    }

    raffle.validate().context("raffle config")?;

    Ok(RuntimeConfig {
        network,
        raffle,
        log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
        log_color: parse_var::<bool, _>(&lookup, "LOG_COLOR")?.unwrap_or(true),
        dev_participants: parse_var::<u64, _>(&lookup, "DEV_PARTICIPANTS")?.unwrap_or(3),
        dev_rounds: parse_var::<u64, _>(&lookup, "DEV_ROUNDS")?.unwrap_or(1),
        dev_seed: parse_var::<u64, _>(&lookup, "DEV_SEED")?,
    })
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("{key}: некорректное значение {raw:?}: {e}")),
    }
}
