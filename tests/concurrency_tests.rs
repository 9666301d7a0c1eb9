// tests/concurrency_tests.rs
//
// Конкурентный доступ к розыгрышу через SharedRaffle:
//
// 1) concurrent_entries_are_all_recorded
//    - N потоков входят одновременно, ни один вход не теряется.
//
// 2) entries_racing_with_close_are_linearizable
//    - входы идут параллельно с закрытием; каждый вход либо попал в раунд
//      до закрытия, либо получил RoundNotOpen.
//
// 3) only_one_close_wins_the_race
//    - несколько keeper'ов закрывают раунд одновременно, запрос один.
//
// 4) async_oracle_callback_is_delivered_later
//    - callback оракула приходит асинхронно через канал tokio.

use std::sync::{Arc, Barrier};
use std::thread;

use raffle_engine::domain::{Address, Amount, NetworkPreset, RaffleConfig, RandomValue, RoundState};
use raffle_engine::engine::{FulfillmentOutcome, RaffleController, RaffleError, SharedRaffle};
use raffle_engine::infra::{InMemoryLedger, MockVrfCoordinator, RngSeed};
use raffle_engine::time_ctrl::ManualClock;

type Shared = SharedRaffle<MockVrfCoordinator, InMemoryLedger, ManualClock>;

fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

fn config() -> RaffleConfig {
    let mut cfg = NetworkPreset::Local.raffle_config();
    cfg.entry_fee = Amount::new(1);
    cfg.interval_secs = 0;
    cfg
}

fn shared_raffle() -> Shared {
    let controller = RaffleController::new(
        config(),
        MockVrfCoordinator::with_funded_subscription(RngSeed::from_u64(3), 1_000),
        InMemoryLedger::new(),
        ManualClock::new(0),
    )
    .expect("valid config");
    SharedRaffle::new(controller)
}

#[test]
fn concurrent_entries_are_all_recorded() {
    let raffle = shared_raffle();
    let threads = 8u64;
    let per_thread = 50u64;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let raffle = raffle.clone();
            thread::spawn(move || {
                for i in 0..per_thread {
                    raffle.enter(addr(t * 1_000 + i), Amount::new(1)).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let (count, balance, mut indices) = raffle
        .with(|r| {
            let indices: Vec<u64> = r
                .events()
                .iter()
                .map(|e| e.index)
                .collect();
            (r.number_of_participants(), r.balance(), indices)
        })
        .unwrap();

    assert_eq!(count as u64, threads * per_thread);
    assert_eq!(balance, Amount::new((threads * per_thread) as u128));
    indices.sort_unstable();
    indices.dedup();
    assert_eq!(indices.len() as u64, threads * per_thread);
}

#[test]
fn entries_racing_with_close_are_linearizable() {
    let raffle = shared_raffle();
    raffle.enter(addr(0), Amount::new(1)).unwrap();

    let barrier = Arc::new(Barrier::new(5));
    let enter_handles: Vec<_> = (1..=4u64)
        .map(|t| {
            let raffle = raffle.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut accepted = 0u64;
                let mut refused = 0u64;
                for i in 0..100 {
                    match raffle.enter(addr(t * 1_000 + i), Amount::new(1)) {
                        Ok(_) => accepted += 1,
                        Err(RaffleError::RoundNotOpen) => refused += 1,
                        Err(other) => panic!("unexpected error: {other:?}"),
                    }
                }
                (accepted, refused)
            })
        })
        .collect();

    barrier.wait();
    let request_id = raffle.begin_close().unwrap();

    let mut accepted_total = 1u64; // вход addr(0)
    for h in enter_handles {
        let (accepted, refused) = h.join().unwrap();
        assert_eq!(accepted + refused, 100);
        accepted_total += accepted;
    }

    let (state, count, balance) = raffle
        .with(|r| (r.state(), r.number_of_participants(), r.balance()))
        .unwrap();
    assert_eq!(state, RoundState::Calculating);
    assert_eq!(count as u64, accepted_total);
    assert_eq!(balance, Amount::new(accepted_total as u128));

    // Банк целиком уходит победителю.
    let outcome = raffle
        .on_randomness(request_id, &[RandomValue::from_u64(0)])
        .unwrap();
    let FulfillmentOutcome::WinnerPicked(receipt) = outcome else {
        panic!("payout expected");
    };
    assert_eq!(receipt.amount, Amount::new(accepted_total as u128));
    assert_eq!(receipt.winner, addr(0));
}

#[test]
fn only_one_close_wins_the_race() {
    let raffle = shared_raffle();
    for i in 0..3 {
        raffle.enter(addr(i), Amount::new(1)).unwrap();
    }

    let barrier = Arc::new(Barrier::new(6));
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let raffle = raffle.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                raffle.begin_close()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();

    assert_eq!(successes.len(), 1);
    assert_eq!(*successes[0], 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, RaffleError::UpkeepNotNeeded { .. })));

    let pending = raffle
        .with(|r| r.oracle().pending_requests().count())
        .unwrap();
    assert_eq!(pending, 1);
}

#[test]
fn async_oracle_callback_is_delivered_later() {
    use tokio::sync::mpsc;

    let raffle = shared_raffle();
    for i in 1..=3 {
        raffle.enter(addr(i), Amount::new(1)).unwrap();
    }
    let request_id = raffle.begin_close().unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");

    let outcome = runtime.block_on(async {
        let (tx, mut rx) = mpsc::channel::<(u64, Vec<RandomValue>)>(4);

        // "Координатор": исполняет запрос и шлёт callback отдельно от запроса.
        let coordinator = raffle.clone();
        let producer = tokio::spawn(async move {
            let fulfillment = coordinator
                .with(|r| r.oracle_mut().fulfill_with_words(request_id, vec![RandomValue::from_u64(4)]))
                .unwrap()
                .unwrap();
            // Сначала чужой callback, потом настоящий.
            tx.send((request_id + 10, vec![RandomValue::from_u64(0)]))
                .await
                .unwrap();
            tx.send((fulfillment.request_id, fulfillment.random_words))
                .await
                .unwrap();
        });

        let mut outcomes = Vec::new();
        while let Some((id, words)) = rx.recv().await {
            outcomes.push(raffle.on_randomness(id, &words).unwrap());
        }
        producer.await.unwrap();
        outcomes
    });

    assert_eq!(outcome.len(), 2);
    assert!(matches!(
        outcome[0],
        FulfillmentOutcome::Rejected {
            reason: RaffleError::UnknownRequestId(_),
            ..
        }
    ));
    match &outcome[1] {
        FulfillmentOutcome::WinnerPicked(receipt) => {
            // 4 mod 3 = 1 → второй участник.
            assert_eq!(receipt.winner, addr(2));
            assert_eq!(receipt.amount, Amount::new(3));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let state = raffle.with(|r| r.state()).unwrap();
    assert_eq!(state, RoundState::Open);
}

#[test]
fn shared_handle_drains_events() {
    let raffle = shared_raffle();
    raffle.enter(addr(1), Amount::new(1)).unwrap();
    raffle.enter(addr(2), Amount::new(1)).unwrap();

    let events = raffle.take_events().unwrap();
    assert_eq!(events.len(), 2);
    assert!(raffle.with(|r| r.events().is_empty()).unwrap());
}
