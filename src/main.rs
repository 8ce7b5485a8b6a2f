use anyhow::Context;
use clap::Parser;
use swu_card_browser::api::{CardApi, CardQuery};
use swu_card_browser::browse;
use swu_card_browser::config::{Cli, ClientConfig, Command, ProxyConfig};
use swu_card_browser::filter::{RangeSpec, SortDirection};
use swu_card_browser::server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => server::serve(ProxyConfig::from(&args)).await?,
        Command::Catalog(args) => {
            let api = CardApi::new(ClientConfig::from(&args))?;
            let catalog = api.fetch_catalog().await.context("fetching catalog")?;
            for entry in catalog {
                println!("{}", entry);
            }
        }
        Command::Search(args) => {
            let api = CardApi::new(ClientConfig::from(&args.client))?;
            let direction = if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let mut query = CardQuery::new(&args.key).sorted_by(args.sort, direction);
            if let Some(range) = args.range.as_deref() {
                query = query.with_range(RangeSpec::parse(range)?);
            }

            let cards = api.browse(&query).await.context("searching cards")?;
            if cards.is_empty() {
                println!("No cards found.");
            }
            for card in &cards {
                println!("{}", browse::card_line(card));
            }
        }
        Command::Browse(args) => {
            let api = CardApi::new(ClientConfig::from(&args))?;
            browse::run(&api).await;
        }
    }

    Ok(())
}
