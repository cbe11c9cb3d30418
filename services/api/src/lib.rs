mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use affiliate_ranker::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
