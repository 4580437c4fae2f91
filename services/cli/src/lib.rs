mod cli;
mod demo;
mod infra;
mod interactive;

use competency_assessment::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
