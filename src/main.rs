use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use farmwaste::cli::{Args, ClassifyArgs, Command, ListingsCommand};
use farmwaste::classifier::DispatchConfig;
use farmwaste::helpers::expand_image_args;
use farmwaste::listing::{self, Quantity, WasteListing};
use farmwaste::loader::{self, ModelSlot, ReadinessPolicy};
use farmwaste::render::{render_result_html, render_result_text};
use farmwaste::{GuidanceBook, LabelSet, Language, LocalStore, ModelSource, ServiceConfig, WasteService};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store_path = args.store.clone().unwrap_or_else(LocalStore::default_path);

    match args.command {
        Command::Classify(classify) => run_classify(classify).await,
        Command::Lang { code } => {
            let mut store = LocalStore::open(&store_path)?;
            let lang = match code {
                Some(code) => {
                    let lang: Language = code.parse()?;
                    lang.save_preference(&mut store)?;
                    info!("language set to {}", lang);
                    lang
                }
                None => Language::load_preference(&store),
            };
            println!("{}", lang.ui_text());
            Ok(())
        }
        Command::Listings(command) => run_listings(command, &store_path),
    }
}

async fn run_classify(args: ClassifyArgs) -> Result<()> {
    let labels = match &args.labels {
        Some(path) => farmwaste::load_class_mapping(path)
            .with_context(|| format!("reading labels from {}", path.display()))?,
        None => LabelSet::default(),
    };
    let images = expand_image_args(&args.images)?;
    if images.is_empty() {
        warn!("no images to classify");
        return Ok(());
    }

    let config = ServiceConfig {
        readiness: ReadinessPolicy {
            max_attempts: args.attempts,
            interval: Duration::from_millis(args.interval_ms),
        },
        ..ServiceConfig::default()
    };
    let DispatchConfig { input_key, output_key } = config.dispatch.clone();

    let slot = Arc::new(ModelSlot::new());
    let service = WasteService::new(slot.clone(), labels, GuidanceBook::builtin(), config)?;
    loader::spawn_load(
        slot,
        ModelSource::parse(&args.model),
        args.cuda,
        input_key,
        output_key,
    );

    let results = service.classify_paths(&images).await;

    for (path, result) in images.iter().zip(results) {
        let Some(result) = result else { continue };
        if args.html {
            println!("<!-- {} -->\n{}", path.display(), render_result_html(&result));
        } else {
            println!("== {}\n{}", path.display(), render_result_text(&result));
        }
    }
    Ok(())
}

fn run_listings(command: ListingsCommand, store_path: &std::path::Path) -> Result<()> {
    let mut store = LocalStore::open(store_path)?;
    match command {
        ListingsCommand::List { html } => {
            let listings = listing::load_listings(&store);
            if listings.is_empty() {
                println!("no listings");
            } else if html {
                println!("{}", listing::render_listings_html(&listings));
            } else {
                println!("{}", listing::render_listings_text(&listings));
            }
        }
        ListingsCommand::Add {
            name,
            quantity,
            contact,
        } => {
            let index = listing::add_listing(
                &mut store,
                WasteListing {
                    name,
                    quantity: Quantity::Number(quantity),
                    contact,
                },
            )?;
            println!("added listing {}", index);
        }
        ListingsCommand::Buy { index } => {
            println!("Contact Farmer: {}", listing::buy(&store, index)?);
        }
    }
    Ok(())
}
