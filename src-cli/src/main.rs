use cadastro_app::cli::Cli;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    cadastro_app::run(Cli::parse()).await
}
