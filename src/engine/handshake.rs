//! Двухфазный обмен с оракулом: запрос случайности и сверка callback'а.
//!
//! Корреляция – одно опциональное поле `Round::pending_request`, а не карта запросов:
//! живым может быть только один запрос.

use crate::domain::{OracleConfig, RandomValue, RandomnessRequest, RequestId, Round};
use crate::engine::errors::RaffleError;
use crate::engine::RandomnessOracle;

/// Запросить у оракула случайность для текущего раунда.
///
/// Запрос отправляется "fire-and-forget": ответ придёт отдельным вызовом.
/// Если оракул отказал, раунд не меняется.
pub fn request_randomness<O: RandomnessOracle>(
    round: &mut Round,
    oracle: &mut O,
    config: &OracleConfig,
) -> Result<RequestId, RaffleError> {
    if let Some(pending) = &round.pending_request {
        return Err(RaffleError::RequestAlreadyPending(pending.request_id));
    }

    let request_id = oracle.request_random_words(config)?;
    round.pending_request = Some(RandomnessRequest::new(request_id, round.epoch));

    Ok(request_id)
}

/// Проверить callback оракула и привязать к запросу доставленное значение.
///
/// Callback может прийти от кого угодно, поэтому доверяем значению только если:
/// - `request_id` совпадает с ожидающим запросом текущего раунда;
/// - это первое значение для запроса, либо повтор того же самого значения
///   (повтор выплаты после `PayoutFailed`).
///
/// Сам запрос здесь не удаляется: он гасится только вместе с успешной выплатой.
pub fn verify_fulfillment(
    round: &mut Round,
    request_id: RequestId,
    value: RandomValue,
) -> Result<(), RaffleError> {
    let epoch = round.epoch;
    let pending = match round.pending_request.as_mut() {
        Some(p) if p.request_id == request_id && p.round_epoch == epoch => p,
        _ => return Err(RaffleError::UnknownRequestId(request_id)),
    };

    match pending.delivered_value {
        None => {
            pending.delivered_value = Some(value);
            Ok(())
        }
        Some(bound) if bound == value => Ok(()),
        Some(_) => Err(RaffleError::RandomnessMismatch { request_id }),
    }
}

/// Значение, принятое для ожидающего запроса (если callback уже приходил).
///
/// Запрос чужого раунда не считается ожидающим, как и в `verify_fulfillment`.
pub fn delivered_value(round: &Round) -> Option<(RequestId, RandomValue)> {
    round
        .pending_request
        .as_ref()
        .filter(|p| p.round_epoch == round.epoch)
        .and_then(|p| p.delivered_value.map(|v| (p.request_id, v)))
}
