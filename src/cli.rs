use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Classify farm waste photos and get disposal guidance", long_about = None)]
pub struct Args {
    /// Key-value store file (language preference, listings)
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify waste photos
    Classify(ClassifyArgs),

    /// Show the UI text, optionally switching language first
    Lang {
        /// Language code: en, hi, pa, mr, bn, ta, te, gu
        code: Option<String>,
    },

    /// Local waste marketplace
    #[command(subcommand)]
    Listings(ListingsCommand),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// ONNX model path or http(s) URL
    #[arg(long, required = true)]
    pub model: String,

    /// image files or directories of images
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Run on CUDA
    #[arg(long)]
    pub cuda: bool,

    /// Label file, one label per line in model output order
    #[arg(long, value_name = "FILE")]
    pub labels: Option<PathBuf>,

    #[arg(long, default_value_t = 10)]
    pub attempts: u32,

    #[arg(long, default_value_t = 500, value_name = "MS")]
    pub interval_ms: u64,

    /// Print results as HTML
    #[arg(long)]
    pub html: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ListingsCommand {
    /// Show all listings
    List {
        #[arg(long)]
        html: bool,
    },
    /// Offer waste for sale
    Add {
        #[arg(long)]
        name: String,
        /// Quantity in kg
        #[arg(long)]
        quantity: f64,
        #[arg(long)]
        contact: String,
    },
    /// Show the seller contact for a listing
    Buy { index: usize },
}
