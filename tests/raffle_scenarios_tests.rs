// tests/raffle_scenarios_tests.rs
//
// Сквозные сценарии: вход → закрытие → callback оракула → выплата.

use raffle_engine::domain::{Address, Amount, NetworkPreset, RaffleConfig, RandomValue, RoundState};
use raffle_engine::engine::{
    FulfillmentOutcome, OracleError, RaffleController, RaffleError, RaffleEventKind,
    RaffleEventLog, TransferError,
};
use raffle_engine::infra::{
    InMemoryLedger, InMemoryRaffleStorage, MockVrfCoordinator, RaffleStorage, RngSeed,
};
use raffle_engine::state::{RaffleSnapshot, WinnerRecord};
use raffle_engine::time_ctrl::ManualClock;

//
// ---------- ВСПОМОГАТЕЛЬНОЕ ----------
//

type TestRaffle = RaffleController<MockVrfCoordinator, InMemoryLedger, ManualClock>;

fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

fn config(fee: u128, interval_secs: u64) -> RaffleConfig {
    let mut cfg = NetworkPreset::Local.raffle_config();
    cfg.entry_fee = Amount::new(fee);
    cfg.interval_secs = interval_secs;
    cfg
}

fn new_raffle(fee: u128, interval_secs: u64) -> (TestRaffle, ManualClock) {
    let clock = ManualClock::new(1_000);
    let coordinator = MockVrfCoordinator::with_funded_subscription(RngSeed::from_u64(7), 1_000);
    let raffle = RaffleController::new(
        config(fee, interval_secs),
        coordinator,
        InMemoryLedger::new(),
        clock.clone(),
    )
    .expect("valid config");
    (raffle, clock)
}

/// Закрыть раунд и доставить конкретное значение.
fn close_with_value(raffle: &mut TestRaffle, value: u64) -> FulfillmentOutcome {
    let request_id = raffle.begin_close().expect("round should be closable");
    let fulfillment = raffle
        .oracle_mut()
        .fulfill_with_words(request_id, vec![RandomValue::from_u64(value)])
        .expect("request is pending at the coordinator");
    raffle
        .on_randomness(fulfillment.request_id, &fulfillment.random_words)
        .expect("payout should succeed")
}

//
// ---------- СЦЕНАРИИ ----------
//

#[test]
fn scenario_three_entrants_third_wins() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    for i in 1..=3 {
        raffle.enter(addr(i), Amount::new(1)).unwrap();
    }

    let outcome = close_with_value(&mut raffle, 5);

    let receipt = match outcome {
        FulfillmentOutcome::WinnerPicked(r) => r,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(receipt.winner, addr(3));
    assert_eq!(receipt.winning_index, 2);
    assert_eq!(receipt.amount, Amount::new(3));
    assert_eq!(receipt.round_epoch, 0);

    assert_eq!(raffle.transfer().balance_of(&addr(3)), Amount::new(3));
    assert_eq!(raffle.state(), RoundState::Open);
    assert!(raffle.participants().is_empty());
    assert_eq!(raffle.balance(), Amount::ZERO);
    assert_eq!(raffle.recent_winner(), Some(addr(3)));
    assert_eq!(raffle.pending_request_id(), None);
    assert_eq!(raffle.round().epoch, 1);
}

#[test]
fn scenario_no_participants_never_eligible() {
    let (mut raffle, clock) = new_raffle(1, 30);

    for _ in 0..5 {
        clock.advance(1_000);
        assert!(!raffle.is_eligible());
    }

    let err = raffle.begin_close().unwrap_err();
    match err {
        RaffleError::UpkeepNotNeeded {
            balance,
            participants,
            state,
            check,
        } => {
            assert_eq!(balance, Amount::ZERO);
            assert_eq!(participants, 0);
            assert_eq!(state, RoundState::Open);
            assert!(check.time_passed);
            assert!(!check.has_participants);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(raffle.state(), RoundState::Open);
    assert!(raffle.oracle().pending_requests().next().is_none());
}

#[test]
fn scenario_second_close_is_rejected_while_calculating() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();

    let request_id = raffle.begin_close().unwrap();
    assert_eq!(request_id, 1);
    assert_eq!(raffle.state(), RoundState::Calculating);

    let err = raffle.begin_close().unwrap_err();
    assert!(matches!(
        err,
        RaffleError::UpkeepNotNeeded {
            state: RoundState::Calculating,
            ..
        }
    ));
    assert_eq!(raffle.pending_request_id(), Some(1));
    assert_eq!(raffle.oracle().pending_requests().count(), 1);
}

#[test]
fn scenario_failed_payout_then_retry_with_same_value() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    for i in 1..=3 {
        raffle.enter(addr(i), Amount::new(1)).unwrap();
    }
    raffle.transfer_mut().block_recipient(addr(3));

    let request_id = raffle.begin_close().unwrap();
    let value = RandomValue::from_u64(5);

    let err = raffle.on_randomness(request_id, &[value]).unwrap_err();
    assert_eq!(
        err,
        RaffleError::PayoutFailed {
            winner: addr(3),
            amount: Amount::new(3),
            reason: TransferError::Rejected(addr(3)),
        }
    );
    assert_eq!(raffle.state(), RoundState::Calculating);
    assert_eq!(raffle.participants(), &[addr(1), addr(2), addr(3)]);
    assert_eq!(raffle.balance(), Amount::new(3));
    assert_eq!(raffle.pending_request_id(), Some(request_id));

    // Подменить значение после неудачной выплаты нельзя.
    let outcome = raffle
        .on_randomness(request_id, &[RandomValue::from_u64(3)])
        .unwrap();
    assert_eq!(
        outcome,
        FulfillmentOutcome::Rejected {
            request_id,
            reason: RaffleError::RandomnessMismatch { request_id },
        }
    );

    raffle.transfer_mut().unblock_recipient(&addr(3));
    let outcome = raffle.on_randomness(request_id, &[value]).unwrap();

    match outcome {
        FulfillmentOutcome::WinnerPicked(receipt) => {
            assert_eq!(receipt.winner, addr(3));
            assert_eq!(receipt.amount, Amount::new(3));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(raffle.state(), RoundState::Open);
    assert!(raffle.participants().is_empty());
    assert_eq!(raffle.balance(), Amount::ZERO);
    assert_eq!(raffle.transfer().balance_of(&addr(3)), Amount::new(3));
}

#[test]
fn retry_payout_uses_bound_value() {
    let (mut raffle, _clock) = new_raffle(2, 0);
    raffle.enter(addr(1), Amount::new(2)).unwrap();
    raffle.enter(addr(2), Amount::new(2)).unwrap();
    raffle.transfer_mut().block_recipient(addr(2));

    let request_id = raffle.begin_close().unwrap();
    assert!(raffle
        .on_randomness(request_id, &[RandomValue::from_u64(1)])
        .is_err());

    raffle.transfer_mut().unblock_recipient(&addr(2));
    let receipt = raffle.retry_payout().unwrap();

    assert_eq!(receipt.request_id, request_id);
    assert_eq!(receipt.winner, addr(2));
    assert_eq!(receipt.amount, Amount::new(4));
    assert_eq!(raffle.state(), RoundState::Open);
}

#[test]
fn retry_payout_without_delivered_value_fails() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    assert_eq!(raffle.retry_payout().unwrap_err(), RaffleError::NoPendingPayout);

    raffle.enter(addr(1), Amount::new(1)).unwrap();
    raffle.begin_close().unwrap();
    assert_eq!(raffle.retry_payout().unwrap_err(), RaffleError::NoPendingPayout);
}

//
// ---------- ОТКЛОНЁННЫЕ CALLBACK'И ----------
//

#[test]
fn duplicate_callback_after_payout_is_rejected() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();
    raffle.enter(addr(2), Amount::new(1)).unwrap();

    let request_id = raffle.begin_close().unwrap();
    let words = [RandomValue::from_u64(0)];
    assert!(matches!(
        raffle.on_randomness(request_id, &words).unwrap(),
        FulfillmentOutcome::WinnerPicked(_)
    ));

    // Новый раунд набирает участников, старый callback приходит ещё раз.
    raffle.enter(addr(3), Amount::new(1)).unwrap();
    let before = raffle.round().clone();

    let outcome = raffle.on_randomness(request_id, &words).unwrap();
    assert_eq!(
        outcome,
        FulfillmentOutcome::Rejected {
            request_id,
            reason: RaffleError::UnknownRequestId(request_id),
        }
    );
    assert_eq!(raffle.round(), &before);
    assert_eq!(raffle.transfer().transfers().len(), 1);
}

#[test]
fn stale_or_foreign_request_id_never_mutates_state() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();

    // Ничего не запрошено: любой callback чужой.
    let before = raffle.round().clone();
    let outcome = raffle.on_randomness(99, &[RandomValue::from_u64(1)]).unwrap();
    assert!(matches!(outcome, FulfillmentOutcome::Rejected { .. }));
    assert_eq!(raffle.round(), &before);

    let request_id = raffle.begin_close().unwrap();
    let before = raffle.round().clone();
    let outcome = raffle
        .on_randomness(request_id + 1, &[RandomValue::from_u64(1)])
        .unwrap();
    assert_eq!(
        outcome,
        FulfillmentOutcome::Rejected {
            request_id: request_id + 1,
            reason: RaffleError::UnknownRequestId(request_id + 1),
        }
    );
    assert_eq!(raffle.round(), &before);
    assert!(raffle.transfer().transfers().is_empty());
}

#[test]
fn callback_without_words_is_rejected() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();
    let request_id = raffle.begin_close().unwrap();

    let outcome = raffle.on_randomness(request_id, &[]).unwrap();
    assert_eq!(
        outcome,
        FulfillmentOutcome::Rejected {
            request_id,
            reason: RaffleError::MissingRandomWords(request_id),
        }
    );
    assert_eq!(raffle.state(), RoundState::Calculating);
}

#[test]
fn only_first_word_is_used() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    for i in 1..=4 {
        raffle.enter(addr(i), Amount::new(1)).unwrap();
    }
    let request_id = raffle.begin_close().unwrap();

    let words = [RandomValue::from_u64(1), RandomValue::from_u64(3)];
    match raffle.on_randomness(request_id, &words).unwrap() {
        FulfillmentOutcome::WinnerPicked(r) => assert_eq!(r.winner, addr(2)),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

//
// ---------- ОРАКУЛ И ВРЕМЯ ----------
//

#[test]
fn oracle_unavailable_leaves_round_open() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();
    raffle.oracle_mut().set_unavailable(true);

    let err = raffle.begin_close().unwrap_err();
    assert!(matches!(err, RaffleError::Oracle(OracleError::Unavailable(_))));
    assert_eq!(raffle.state(), RoundState::Open);
    assert_eq!(raffle.pending_request_id(), None);

    // Вход всё ещё работает, а после восстановления оракула – закрытие.
    raffle.enter(addr(2), Amount::new(1)).unwrap();
    raffle.oracle_mut().set_unavailable(false);
    assert_eq!(raffle.begin_close().unwrap(), 1);
}

#[test]
fn interval_gates_closing_and_restarts_after_payout() {
    let (mut raffle, clock) = new_raffle(1, 30);
    raffle.enter(addr(1), Amount::new(1)).unwrap();

    clock.advance(29);
    assert!(!raffle.is_eligible());
    assert!(raffle.begin_close().is_err());

    clock.advance(1);
    assert!(raffle.is_eligible());

    let FulfillmentOutcome::WinnerPicked(receipt) = close_with_value(&mut raffle, 0) else {
        panic!("payout expected");
    };
    assert_eq!(receipt.closed_at, 1_030);
    assert_eq!(raffle.last_close_timestamp(), 1_030);

    // Новый раунд снова ждёт полный интервал.
    raffle.enter(addr(2), Amount::new(1)).unwrap();
    clock.advance(10);
    assert!(!raffle.is_eligible());
    clock.advance(20);
    assert!(raffle.is_eligible());
}

#[test]
fn entries_blocked_while_calculating() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();
    raffle.begin_close().unwrap();

    assert_eq!(
        raffle.enter(addr(2), Amount::new(1)).unwrap_err(),
        RaffleError::RoundNotOpen
    );
    assert_eq!(raffle.number_of_participants(), 1);
}

#[test]
fn mock_coordinator_words_pick_a_participant() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    for i in 1..=5 {
        raffle.enter(addr(i), Amount::new(1)).unwrap();
    }
    let request_id = raffle.begin_close().unwrap();
    let fulfillment = raffle.oracle_mut().fulfill(request_id).unwrap();
    assert_eq!(fulfillment.random_words.len(), 1);

    let expected = fulfillment.random_words[0].reduce(5) as usize;
    match raffle
        .on_randomness(request_id, &fulfillment.random_words)
        .unwrap()
    {
        FulfillmentOutcome::WinnerPicked(r) => {
            assert_eq!(r.winning_index, expected);
            assert_eq!(r.winner, addr(expected as u64 + 1));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

//
// ---------- СОБЫТИЯ И ЗАПРОСЫ ----------
//

#[test]
fn events_are_emitted_in_order() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();
    raffle.enter(addr(2), Amount::new(1)).unwrap();
    close_with_value(&mut raffle, 1);

    let events = raffle.take_events();
    let kinds: Vec<_> = events.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            RaffleEventKind::EntryAccepted {
                participant: addr(1),
                index: 0
            },
            RaffleEventKind::EntryAccepted {
                participant: addr(2),
                index: 1
            },
            RaffleEventKind::CloseRequested { request_id: 1 },
            RaffleEventKind::WinnerPicked { winner: addr(2) },
        ]
    );
    assert!(events.iter().all(|e| e.round_epoch == 0));
    let indices: Vec<u64> = events.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);

    // Журнал опустошён, нумерация продолжается.
    assert!(raffle.events().is_empty());
    raffle.enter(addr(3), Amount::new(1)).unwrap();
    assert_eq!(raffle.events()[0].index, 4);
    assert_eq!(raffle.events()[0].round_epoch, 1);
}

#[test]
fn rejected_entry_emits_no_event() {
    let (mut raffle, _clock) = new_raffle(5, 0);
    assert!(raffle.enter(addr(1), Amount::new(4)).is_err());
    assert!(raffle.events().is_empty());
}

#[test]
fn participant_lookup_and_getters() {
    let (mut raffle, _clock) = new_raffle(1, 45);
    raffle.enter(addr(10), Amount::new(1)).unwrap();

    assert_eq!(raffle.participant(0).unwrap(), addr(10));
    assert_eq!(
        raffle.participant(1).unwrap_err(),
        RaffleError::ParticipantNotFound(1)
    );
    assert_eq!(raffle.entry_fee(), Amount::new(1));
    assert_eq!(raffle.interval_secs(), 45);
    assert_eq!(raffle.request_confirmations(), 3);
    assert_eq!(raffle.num_words(), 1);
    assert_eq!(raffle.last_close_timestamp(), 1_000);
    assert_eq!(raffle.recent_winner(), None);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut cfg = config(1, 0);
    cfg.oracle.num_words = 0;

    let result = RaffleController::new(
        cfg,
        MockVrfCoordinator::with_funded_subscription(RngSeed::from_u64(1), 1),
        InMemoryLedger::new(),
        ManualClock::new(0),
    );
    assert!(matches!(result, Err(RaffleError::InvalidConfig(_))));
}

//
// ---------- СНАПШОТЫ И ХРАНИЛИЩЕ ----------
//

#[test]
fn restore_from_snapshot_mid_calculation() {
    let (mut raffle, clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();
    raffle.enter(addr(2), Amount::new(1)).unwrap();
    let request_id = raffle.begin_close().unwrap();

    let mut storage = InMemoryRaffleStorage::new();
    storage.save_snapshot(&raffle.snapshot());

    // "Рестарт": новый контроллер из снапшота, свежие коллабораторы.
    let snapshot = storage.load_snapshot().unwrap();
    let oracle = MockVrfCoordinator::with_funded_subscription(RngSeed::from_u64(7), 1_000);
    let mut restored =
        RaffleController::restore(snapshot, oracle, InMemoryLedger::new(), clock.clone()).unwrap();

    assert_eq!(restored.state(), RoundState::Calculating);
    assert_eq!(restored.pending_request_id(), Some(request_id));
    assert_eq!(restored.participants(), &[addr(1), addr(2)]);

    let outcome = restored
        .on_randomness(request_id, &[RandomValue::from_u64(1)])
        .unwrap();
    let FulfillmentOutcome::WinnerPicked(receipt) = outcome else {
        panic!("payout expected");
    };
    storage.record_winner(WinnerRecord::from_receipt(&receipt));

    assert_eq!(restored.transfer().balance_of(&addr(2)), Amount::new(2));
    assert_eq!(storage.rounds_completed(), 1);
    assert_eq!(storage.winner(0).unwrap().winner, addr(2));
}

#[test]
fn inconsistent_snapshot_is_refused() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();

    // Calculating без ожидающего запроса.
    let mut broken = raffle.snapshot();
    broken.round.state = RoundState::Calculating;
    assert!(broken.clone().into_parts().is_err());

    // Раунд с другим взносом, чем в конфиге.
    let mut mismatched = raffle.snapshot();
    mismatched.round.entry_fee = Amount::new(2);
    assert!(mismatched.into_parts().is_err());

    // Ожидающий запрос от другого раунда: после восстановления раунд застрял бы в Calculating.
    raffle.begin_close().unwrap();
    let mut foreign_epoch = raffle.snapshot();
    foreign_epoch
        .round
        .pending_request
        .as_mut()
        .unwrap()
        .round_epoch = 7;
    assert!(foreign_epoch.clone().into_parts().is_err());
    assert!(matches!(
        RaffleController::restore(
            foreign_epoch,
            MockVrfCoordinator::new(RngSeed::from_u64(1)),
            InMemoryLedger::new(),
            ManualClock::new(0),
        ),
        Err(RaffleError::Internal(_))
    ));

    let result = RaffleController::restore(
        broken,
        MockVrfCoordinator::new(RngSeed::from_u64(1)),
        InMemoryLedger::new(),
        ManualClock::new(0),
    );
    assert!(matches!(result, Err(RaffleError::Internal(_))));
}

#[test]
fn snapshot_round_trips_through_json() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    raffle.enter(addr(1), Amount::new(1)).unwrap();
    raffle.begin_close().unwrap();

    let snapshot = raffle.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: RaffleSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn several_rounds_in_a_row() {
    let (mut raffle, _clock) = new_raffle(1, 0);
    let mut storage = InMemoryRaffleStorage::new();

    for round_no in 0..3u64 {
        for i in 0..=round_no {
            raffle.enter(addr(100 * round_no + i), Amount::new(1)).unwrap();
        }
        let FulfillmentOutcome::WinnerPicked(receipt) = close_with_value(&mut raffle, round_no)
        else {
            panic!("payout expected");
        };
        assert_eq!(receipt.round_epoch, round_no);
        assert_eq!(receipt.request_id, round_no + 1);
        assert_eq!(receipt.amount, Amount::new(round_no as u128 + 1));
        storage.record_winner(WinnerRecord::from_receipt(&receipt));
    }

    assert_eq!(raffle.round().epoch, 3);
    assert_eq!(storage.rounds_completed(), 3);
    assert_eq!(storage.winners().count(), 3);
}

#[test]
fn event_log_keeps_only_latest_events() {
    let mut log = RaffleEventLog::new();
    let extra = 10u64;
    let total = RaffleEventLog::MAX_EVENTS as u64 + extra;
    for i in 0..total {
        log.push(
            0,
            RaffleEventKind::EntryAccepted {
                participant: addr(i),
                index: i as usize,
            },
        );
    }

    assert_eq!(log.events.len(), RaffleEventLog::MAX_EVENTS);
    assert_eq!(log.events[0].index, extra);
    assert_eq!(log.last().unwrap().index, total - 1);

    let drained = log.drain();
    assert_eq!(drained.len(), RaffleEventLog::MAX_EVENTS);
    assert!(log.events.is_empty());

    log.push(1, RaffleEventKind::CloseRequested { request_id: 1 });
    assert_eq!(log.events[0].index, total);
}
