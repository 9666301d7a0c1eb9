//! Инфраструктурный слой вокруг движка розыгрыша:
//! - генерация ID;
//! - RNG-реализации;
//! - мок VRF-координатора;
//! - in-memory реестр балансов для выплат;
//! - абстракция хранения (off-chain / тесты).

pub mod ids;
pub mod ledger;
pub mod oracle;
pub mod persistence;
#[cfg(not(target_arch = "wasm32"))]
pub mod rng;
pub mod rng_seed;

pub use ids::*;
pub use ledger::*;
pub use oracle::*;
pub use persistence::*;
#[cfg(not(target_arch = "wasm32"))]
pub use rng::*;
pub use rng_seed::RngSeed;
