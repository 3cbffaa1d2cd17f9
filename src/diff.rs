//! Catalog set-difference.
//!
//! Partitions one catalog into the rows whose key already exists in a master
//! catalog (`removed`) and the rows it has never seen (`kept`). Both outputs
//! preserve the catalog's original row order, and together they reconstruct
//! it exactly.

use crate::cli::DiffArgs;
use crate::table::{self, Row};
use anyhow::{Context, Result};
use std::collections::HashSet;

/// The two ordered partitions of a catalog.
#[derive(Debug, Default)]
pub struct Partition {
    /// Rows whose key is absent from the master index.
    pub kept: Vec<Row>,
    /// Rows whose key appears in the master index.
    pub removed: Vec<Row>,
}

/// Collect the identifier set from a catalog's key column. Duplicates
/// collapse; rows without the column contribute nothing.
pub fn key_index(rows: &[Row], key_column: &str) -> HashSet<String> {
    rows.iter()
        .filter_map(|row| row.get(key_column))
        .filter(|key| !key.is_empty())
        .cloned()
        .collect()
}

/// Split `catalog` by membership of its key column in `index`. Each row is
/// tested independently, so duplicate keys in the catalog land in the same
/// partition as their first occurrence without being collapsed.
pub fn partition(catalog: Vec<Row>, index: &HashSet<String>, key_column: &str) -> Partition {
    let mut outcome = Partition::default();
    for row in catalog {
        let matched = row
            .get(key_column)
            .is_some_and(|key| index.contains(key));
        if matched {
            outcome.removed.push(row);
        } else {
            outcome.kept.push(row);
        }
    }
    outcome
}

/// Load both catalogs, partition, and write the two outputs under the
/// catalog's own header.
pub fn run(args: &DiffArgs) -> Result<()> {
    let master = table::read_table(&args.master)
        .with_context(|| format!("load master catalog {}", args.master.display()))?;
    let catalog = table::read_table(&args.catalog)
        .with_context(|| format!("load catalog {}", args.catalog.display()))?;

    // Even an empty catalog needs a header to serialize the two partitions.
    let headers = catalog.derived_headers().with_context(|| {
        format!("derive output header from {}", args.catalog.display())
    })?;

    let index = key_index(&master.rows, &args.master_key);
    let total = catalog.rows.len();
    let outcome = partition(catalog.rows, &index, &args.catalog_key);
    tracing::info!(
        total,
        kept = outcome.kept.len(),
        removed = outcome.removed.len(),
        master_keys = index.len(),
        "partitioned catalog"
    );

    let columns = table::plain_columns(&headers);
    table::write_csv(&args.kept, &columns, &outcome.kept)
        .with_context(|| format!("write kept rows to {}", args.kept.display()))?;
    table::write_csv(&args.removed, &columns, &outcome.removed)
        .with_context(|| format!("write removed rows to {}", args.removed.display()))?;
    Ok(())
}
