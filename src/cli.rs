//! CLI argument parsing for the catalog preparation workflow.
//!
//! The CLI is intentionally thin: each subcommand collects paths and knobs
//! and hands off to its module, so the same core logic can be reused
//! elsewhere.
use crate::enrich::FieldPolicy;
use crate::expand::profile::ProfileName;
use crate::expand::MismatchPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the catalog preparation workflow.
///
/// Keeping a single `RootArgs` type makes command routing obvious and avoids
/// hidden defaults in subcommand constructors.
#[derive(Parser, Debug)]
#[command(
    name = "shopprep",
    version,
    about = "Supplier catalog preparation for Shopify imports",
    after_help = "Commands:\n  expand --input <file> --output <file> --profile <name>  Expand supplier rows into a Shopify product sheet\n  diff --master <file> --catalog <file>                   Split a catalog by membership in a master sheet\n  enrich --input <file>                                   Fill descriptive fields via a text-generation service\n\nExamples:\n  shopprep expand --input fox.xlsx --output fox-import.csv --profile fox --cross-ref details.csv\n  shopprep expand --input madisons.csv --output madisons-import.csv --profile madisons\n  shopprep diff --master master.csv --catalog export.csv --kept kept.csv --removed removed.csv\n  shopprep enrich --input import.csv --policy improve-if-present --scrub-ascii",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level workflow commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Expand(ExpandArgs),
    Diff(DiffArgs),
    Enrich(EnrichArgs),
}

/// Expand command inputs for one supplier feed.
#[derive(Parser, Debug)]
#[command(about = "Expand a supplier feed into master/image/variant rows")]
pub struct ExpandArgs {
    /// Supplier feed to expand (.csv, .xlsx, .xlsm, or .xls)
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output CSV path for the expanded product sheet
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    /// Supplier profile describing grouping, columns, and image layout
    #[arg(long, value_enum, value_name = "NAME")]
    pub profile: ProfileName,

    /// Secondary sheet joined by the profile's cross-reference key
    #[arg(long, value_name = "FILE")]
    pub cross_ref: Option<PathBuf>,

    /// What to do with rows whose key column does not match the profile's
    /// grouping pattern
    #[arg(long, value_enum, value_name = "POLICY", default_value = "drop")]
    pub on_mismatch: MismatchPolicy,
}

/// Diff command inputs for one master/catalog pair.
#[derive(Parser, Debug)]
#[command(about = "Split a catalog by key membership in a master sheet")]
pub struct DiffArgs {
    /// Master sheet whose keys define the removed set
    #[arg(long, value_name = "FILE")]
    pub master: PathBuf,

    /// Catalog to partition, row order preserved in both outputs
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Output CSV for catalog rows whose key is absent from the master
    #[arg(long, value_name = "FILE")]
    pub kept: PathBuf,

    /// Output CSV for catalog rows whose key appears in the master
    #[arg(long, value_name = "FILE")]
    pub removed: PathBuf,

    /// Key column in the master sheet
    #[arg(long, value_name = "COLUMN", default_value = "SKU")]
    pub master_key: String,

    /// Key column in the catalog
    #[arg(long, value_name = "COLUMN", default_value = "Variant SKU")]
    pub catalog_key: String,
}

/// Enrich command inputs for one catalog CSV.
#[derive(Parser, Debug)]
#[command(about = "Fill descriptive fields via a text-generation service")]
pub struct EnrichArgs {
    /// Catalog CSV to enrich
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output CSV path; defaults to <input>-processed-<epoch>.csv
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// What to do with descriptive fields that are already populated
    #[arg(long, value_enum, value_name = "POLICY", default_value = "generate-if-empty")]
    pub policy: FieldPolicy,

    /// Strip non-ASCII characters and wrapping quotes from generated fields
    #[arg(long)]
    pub scrub_ascii: bool,

    /// Skip tag, category, and product type classification
    #[arg(long)]
    pub no_classify: bool,

    /// Minimum delay between rows, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 250)]
    pub row_delay_ms: u64,

    /// Token budget per generation call
    #[arg(long, value_name = "N", default_value_t = 2500)]
    pub max_tokens: u32,

    /// Sampling temperature for the generation service
    #[arg(long, value_name = "T", default_value_t = 0.7)]
    pub temperature: f32,

    /// Rate-limited attempts per call before a field is abandoned
    #[arg(long, value_name = "N", default_value_t = 16)]
    pub max_attempts: u32,
}
