// src/bin/raffle_dev_cli.rs
//
// Локальная симуляция розыгрыша: N раундов против мок-координатора и in-memory реестра.
// Параметры – из окружения (см. config::from_lookup).

use anyhow::{anyhow, bail, Result};
use tracing::{debug, info, warn};

use raffle_engine::api::{execute_command, run_query, Command, EnterCommand, Query, QueryResponse};
use raffle_engine::domain::Address;
use raffle_engine::engine::{FulfillmentOutcome, RaffleController, RaffleError};
use raffle_engine::infra::{
    InMemoryLedger, InMemoryRaffleStorage, MockVrfCoordinator, RaffleStorage, RngSeed, SystemRng,
};
use raffle_engine::state::WinnerRecord;
use raffle_engine::time_ctrl::{Clock, ManualClock, SystemClock};
use raffle_engine::{config, logging};

/// Сколько "LINK" кладём на подписку мок-координатора.
const MOCK_SUBSCRIPTION_FUNDS: u128 = 10_000;

fn main() -> Result<()> {
    let cfg = config::load()?;
    logging::init_tracing(&cfg);

    if !cfg.network.is_development() {
        bail!(
            "dev CLI работает только с dev-сетью, а выбрана {:?} (chain id {})",
            cfg.network,
            cfg.network.chain_id()
        );
    }

    let seed = match cfg.dev_seed {
        Some(s) => RngSeed::from_u64(s),
        None => RngSeed::from_source(&mut SystemRng),
    };
    let coordinator = MockVrfCoordinator::with_funded_subscription(seed, MOCK_SUBSCRIPTION_FUNDS);
    let clock = ManualClock::new(SystemClock.now());

    let mut raffle = RaffleController::new(
        cfg.raffle.clone(),
        coordinator,
        InMemoryLedger::new(),
        clock.clone(),
    )?;
    let mut storage = InMemoryRaffleStorage::new();

    info!(
        network = ?cfg.network,
        rounds = cfg.dev_rounds,
        participants = cfg.dev_participants,
        "starting dev simulation"
    );

    for round_no in 0..cfg.dev_rounds {
        for i in 0..cfg.dev_participants {
            let caller = Address::from_low_u64(round_no * 1_000 + i + 1);
            execute_command(
                &mut raffle,
                Command::Enter(EnterCommand {
                    caller,
                    paid: cfg.raffle.entry_fee,
                }),
            )
            .map_err(|e| anyhow!("enter failed: {e:?}"))?;
        }

        clock.advance(cfg.raffle.interval_secs);

        let upkeep = run_query(&raffle, &Query::CheckUpkeep).map_err(|e| anyhow!("{e:?}"))?;
        if let QueryResponse::Upkeep(view) = upkeep {
            info!(round_no, upkeep_needed = view.upkeep_needed, "keeper poll");
        }

        let request_id = match raffle.begin_close() {
            Ok(id) => id,
            Err(err @ RaffleError::UpkeepNotNeeded { .. }) => {
                warn!(round_no, error = %err, "round skipped");
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let fulfillment = raffle.oracle_mut().fulfill(request_id)?;
        match raffle.on_randomness(fulfillment.request_id, &fulfillment.random_words)? {
            FulfillmentOutcome::WinnerPicked(receipt) => {
                println!(
                    "round {}: winner {} (index {}) got {}",
                    receipt.round_epoch, receipt.winner, receipt.winning_index, receipt.amount
                );
                storage.record_winner(WinnerRecord::from_receipt(&receipt));
            }
            FulfillmentOutcome::Rejected { request_id, reason } => {
                bail!("callback {request_id} rejected: {reason}");
            }
        }

        for event in raffle.take_events() {
            debug!(index = event.index, round_epoch = event.round_epoch, kind = ?event.kind, "raffle event");
        }
        storage.save_snapshot(&raffle.snapshot());
    }

    if let QueryResponse::Round(view) =
        run_query(&raffle, &Query::GetRound).map_err(|e| anyhow!("{e:?}"))?
    {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }
    info!(rounds_completed = storage.rounds_completed(), "dev simulation finished");

    Ok(())
}
