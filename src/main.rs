use clap::Parser;
use roster_bot::{args::Args, run, setup_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();
    let args = Args::parse();
    run(args).await
}
