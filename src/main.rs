use clap::Parser;
use dotenv::dotenv;
use grok_query::cli::Args;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    let args = Args::parse();
    grok_query::run(args).await
}
