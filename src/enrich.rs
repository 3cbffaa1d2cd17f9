//! Sequential enrichment of catalog rows via a text-generation service.
//!
//! Rows are processed strictly one at a time, in order, because later
//! prompts for a row depend on values resolved earlier in the same row and
//! because the generation service is rate limited. The only state carried
//! across rows is the backoff controller; a successful call anywhere resets
//! it to its floor.

mod prompts;

use crate::backoff::Backoff;
use crate::cli::EnrichArgs;
use crate::generate::{GenerationError, OpenAiGenerator, TextGenerator};
use crate::table::{self, Row};
use crate::util::{
    capitalize_first, capitalize_list, parse_price, slugify, strip_non_ascii,
    strip_wrapping_quotes,
};
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const HANDLE: &str = "Handle";
const TITLE: &str = "Title";
const VENDOR: &str = "Vendor";
const BODY_HTML: &str = "Body (HTML)";
const SEO_TITLE: &str = "SEO Title";
const SEO_DESCRIPTION: &str = "SEO Description";
const IMAGE_ALT: &str = "Image Alt Text";
const TAGS: &str = "Tags";
const CATEGORY: &str = "Product Category";
const TYPE: &str = "Type";
const VARIANT_PRICE: &str = "Variant Price";

/// First letter capitalized after enrichment; Tags and Type are treated as
/// comma-separated lists.
const CAPITALIZE_COLUMNS: &[&str] = &[TITLE, VENDOR, CATEGORY, TYPE, TAGS];

/// What to do with a descriptive field that is already populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldPolicy {
    /// Fill empty fields, leave populated fields untouched. Idempotent:
    /// re-running over an enriched file changes nothing.
    GenerateIfEmpty,
    /// Fill empty fields and rework populated ones with an "improve" prompt.
    ImproveIfPresent,
    /// Fill empty fields and clear populated ones.
    BlankIfPresent,
}

/// Tuning for one enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub policy: FieldPolicy,
    /// Strip non-ASCII characters and wrapping quotes from descriptive
    /// fields after generation.
    pub scrub_ascii: bool,
    /// Derive tags, category, and product type from the resolved fields.
    pub classify: bool,
    /// Minimum delay after each row, applied even on success.
    pub row_delay: Duration,
    pub max_tokens: u32,
    /// Rate-limited attempts per call before the field is abandoned.
    pub max_attempts: u32,
    pub backoff_floor: Duration,
    pub backoff_ceiling: Duration,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            policy: FieldPolicy::GenerateIfEmpty,
            scrub_ascii: false,
            classify: true,
            row_delay: Duration::from_millis(250),
            max_tokens: 2500,
            max_attempts: 16,
            backoff_floor: Duration::from_millis(250),
            backoff_ceiling: Duration::from_secs(60),
        }
    }
}

/// Drives the per-row field pipeline against a [`TextGenerator`].
pub struct Enricher<G> {
    generator: G,
    backoff: Backoff,
    options: EnrichOptions,
}

impl<G: TextGenerator> Enricher<G> {
    pub fn new(generator: G, options: EnrichOptions) -> Self {
        let backoff = Backoff::new(options.backoff_floor, options.backoff_ceiling);
        Self {
            generator,
            backoff,
            options,
        }
    }

    /// Process every row in order, pacing with the per-row delay.
    pub fn process(&mut self, rows: &mut [Row]) {
        let total = rows.len();
        for (index, row) in rows.iter_mut().enumerate() {
            tracing::info!(row = index + 1, total, "processing row");
            self.process_row(row);
            thread::sleep(self.options.row_delay);
        }
    }

    fn process_row(&mut self, row: &mut Row) {
        if let Some(handle) = row.get_mut(HANDLE) {
            if !handle.is_empty() {
                *handle = slugify(handle);
            }
        }

        let title = field(row, TITLE);
        self.fill_field(row, BODY_HTML, &title, prompts::generate_body, prompts::improve_body);
        self.fill_field(
            row,
            SEO_TITLE,
            &title,
            prompts::generate_seo_title,
            prompts::improve_seo_title,
        );
        self.fill_field(
            row,
            SEO_DESCRIPTION,
            &title,
            prompts::generate_seo_description,
            prompts::improve_seo_description,
        );
        self.fill_field(
            row,
            IMAGE_ALT,
            &title,
            prompts::generate_image_alt,
            prompts::improve_image_alt,
        );

        if self.options.classify {
            self.classify_row(row, &title);
        }

        if self.options.scrub_ascii {
            scrub_row(row);
        }
        postprocess_row(row);
    }

    /// Resolve one descriptive field per the configured policy.
    fn fill_field(
        &mut self,
        row: &mut Row,
        column: &str,
        title: &str,
        generate_prompt: fn(&str) -> String,
        improve_prompt: fn(&str) -> String,
    ) {
        let current = field(row, column);
        if current.is_empty() {
            if title.is_empty() {
                return;
            }
            if let Some(text) = self.generate(&generate_prompt(title)) {
                row.insert(column.to_string(), text);
            }
            return;
        }
        match self.options.policy {
            FieldPolicy::GenerateIfEmpty => {}
            FieldPolicy::ImproveIfPresent => {
                // A failed improve call keeps the existing value rather than
                // clobbering it with nothing.
                if let Some(text) = self.generate(&improve_prompt(&current)) {
                    row.insert(column.to_string(), text);
                }
            }
            FieldPolicy::BlankIfPresent => {
                row.insert(column.to_string(), String::new());
            }
        }
    }

    /// Derive tags, category, and type from the resolved fields. These are
    /// overwritten only under [`FieldPolicy::ImproveIfPresent`]; the other
    /// policies fill them just when empty so re-runs stay idempotent.
    fn classify_row(&mut self, row: &mut Row, title: &str) {
        let body = field(row, BODY_HTML);
        let seo_title = field(row, SEO_TITLE);
        let seo_description = field(row, SEO_DESCRIPTION);
        let refresh = self.options.policy == FieldPolicy::ImproveIfPresent;

        let tags_ready = !title.is_empty()
            && !body.is_empty()
            && !seo_title.is_empty()
            && !seo_description.is_empty();
        if tags_ready && (refresh || field(row, TAGS).is_empty()) {
            if let Some(text) =
                self.generate(&prompts::tags(title, &body, &seo_title, &seo_description))
            {
                row.insert(TAGS.to_string(), text);
            }
        }

        let classify_ready = !title.is_empty() && !body.is_empty();
        if classify_ready && (refresh || field(row, CATEGORY).is_empty()) {
            if let Some(text) = self.generate(&prompts::category(title, &body)) {
                row.insert(CATEGORY.to_string(), text);
            }
        }
        if classify_ready && (refresh || field(row, TYPE).is_empty()) {
            if let Some(text) = self.generate(&prompts::product_type(title, &body)) {
                row.insert(TYPE.to_string(), text);
            }
        }
    }

    /// One generation call with rate-limit retry. Returns `None` when the
    /// field should be left as-is: a non-rate-limit failure, or the retry
    /// budget is exhausted.
    fn generate(&mut self, prompt: &str) -> Option<String> {
        let mut attempts = 0u32;
        loop {
            match self.generator.generate(prompt, self.options.max_tokens) {
                Ok(text) => {
                    self.backoff.reset();
                    let text = text.trim().to_string();
                    return (!text.is_empty()).then_some(text);
                }
                Err(GenerationError::RateLimited) => {
                    attempts += 1;
                    if attempts >= self.options.max_attempts {
                        tracing::error!(attempts, "still rate limited; abandoning this field");
                        return None;
                    }
                    tracing::warn!(
                        wait_ms = self.backoff.current().as_millis() as u64,
                        "rate limit exceeded; backing off"
                    );
                    self.backoff.wait();
                }
                Err(GenerationError::Failed(error)) => {
                    tracing::error!("generation failed, leaving field unset: {error:#}");
                    return None;
                }
            }
        }
    }
}

fn field(row: &Row, column: &str) -> String {
    row.get(column).cloned().unwrap_or_default()
}

/// Strip non-ASCII bytes from long-form fields and wrapping quotes the
/// generation service sometimes adds.
fn scrub_row(row: &mut Row) {
    for column in [BODY_HTML, SEO_TITLE, SEO_DESCRIPTION] {
        if let Some(value) = row.get_mut(column) {
            *value = strip_non_ascii(value);
        }
    }
    for column in [TYPE, SEO_TITLE, SEO_DESCRIPTION] {
        if let Some(value) = row.get_mut(column) {
            *value = strip_wrapping_quotes(value).to_string();
        }
    }
}

/// Deterministic cleanup: capitalization and price normalization.
fn postprocess_row(row: &mut Row) {
    for column in CAPITALIZE_COLUMNS {
        if let Some(value) = row.get_mut(*column) {
            if value.is_empty() {
                continue;
            }
            *value = if *column == TAGS || *column == TYPE {
                capitalize_list(value)
            } else {
                capitalize_first(value)
            };
        }
    }
    if let Some(price) = row.get_mut(VARIANT_PRICE) {
        if !price.is_empty() {
            *price = parse_price(price)
                .map(|value| value.to_string())
                .unwrap_or_default();
        }
    }
}

/// Default output path: `<input>-processed-<unix seconds>.csv`.
fn default_output_path(input: &Path) -> PathBuf {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("catalog");
    input.with_file_name(format!("{stem}-processed-{epoch}.csv"))
}

/// Read the catalog, enrich every row, and write the result.
pub fn run(args: &EnrichArgs) -> Result<()> {
    let input = table::read_csv(&args.input)
        .with_context(|| format!("load catalog {}", args.input.display()))?;
    if input.rows.is_empty() {
        tracing::info!(path = %args.input.display(), "no rows to enrich");
        return Ok(());
    }

    let generator = OpenAiGenerator::from_env(args.temperature)?;
    let options = EnrichOptions {
        policy: args.policy,
        scrub_ascii: args.scrub_ascii,
        classify: !args.no_classify,
        row_delay: Duration::from_millis(args.row_delay_ms),
        max_tokens: args.max_tokens,
        max_attempts: args.max_attempts,
        ..EnrichOptions::default()
    };

    let mut rows = input.rows;
    Enricher::new(generator, options).process(&mut rows);

    // Enrichment may add columns the input lacked; the first processed row
    // carries the full output column set.
    let headers: Vec<String> = rows
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or(input.headers);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    table::write_csv(&output, &table::plain_columns(&headers), &rows)
        .with_context(|| format!("write {}", output.display()))?;
    tracing::info!(rows = rows.len(), output = %output.display(), "wrote enriched catalog");
    Ok(())
}

#[cfg(test)]
#[path = "enrich/orchestrator_tests.rs"]
mod tests;
