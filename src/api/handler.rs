//! Исполнение команд и запросов API поверх `RaffleController`.

use crate::engine::{FulfillmentOutcome, FundsTransfer, RaffleController, RandomnessOracle};
use crate::time_ctrl::Clock;

use super::commands::Command;
use super::dto::CommandResponse;
use super::errors::ApiError;
use super::queries::{build_round_view, Query, QueryResponse};

/// Применить команду к контроллеру.
pub fn execute_command<O, T, C>(
    raffle: &mut RaffleController<O, T, C>,
    command: Command,
) -> Result<CommandResponse, ApiError>
where
    O: RandomnessOracle,
    T: FundsTransfer,
    C: Clock,
{
    match command {
        Command::Enter(cmd) => {
            let receipt = raffle.enter(cmd.caller, cmd.paid)?;
            Ok(CommandResponse::Entered {
                participant: receipt.participant,
                index: receipt.index,
            })
        }
        Command::PerformUpkeep => {
            let request_id = raffle.begin_close()?;
            Ok(CommandResponse::CloseRequested { request_id })
        }
        Command::FulfillRandomWords(cmd) => {
            match raffle.on_randomness(cmd.request_id, &cmd.random_words)? {
                FulfillmentOutcome::WinnerPicked(receipt) => Ok(CommandResponse::WinnerPicked {
                    request_id: receipt.request_id,
                    winner: receipt.winner,
                    winning_index: receipt.winning_index,
                    amount: receipt.amount,
                }),
                FulfillmentOutcome::Rejected { request_id, reason } => {
                    Ok(CommandResponse::CallbackRejected {
                        request_id,
                        reason: reason.to_string(),
                    })
                }
            }
        }
        Command::RetryPayout => {
            let receipt = raffle.retry_payout()?;
            Ok(CommandResponse::WinnerPicked {
                request_id: receipt.request_id,
                winner: receipt.winner,
                winning_index: receipt.winning_index,
                amount: receipt.amount,
            })
        }
    }
}

/// Ответить на запрос "только чтение".
pub fn run_query<O, T, C>(
    raffle: &RaffleController<O, T, C>,
    query: &Query,
) -> Result<QueryResponse, ApiError>
where
    O: RandomnessOracle,
    T: FundsTransfer,
    C: Clock,
{
    let response = match query {
        Query::GetRound => QueryResponse::Round(build_round_view(raffle.round(), &raffle.config().oracle)),
        Query::GetParticipant { index } => QueryResponse::Participant(raffle.participant(*index)?),
        Query::CheckUpkeep => QueryResponse::Upkeep(raffle.check_upkeep().into()),
        Query::GetRecentWinner => QueryResponse::RecentWinner(raffle.recent_winner()),
        Query::GetEvents => QueryResponse::Events(raffle.events().to_vec()),
    };
    Ok(response)
}
