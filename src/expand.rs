//! Variant expansion: flat supplier rows into master/variant/image rows.
//!
//! The algorithm is a single left-to-right scan that clusters rows by a
//! derived grouping key (stable: first-seen group order, insertion order
//! within a group), then emits per group a fully-populated master row for
//! the first member, the profile's synthetic image rows, and a minimal
//! variant row for every remaining member. The master always precedes the
//! rest of its group.

pub mod profile;

use crate::cli::ExpandArgs;
use crate::sizes::normalize_size;
use crate::table::{self, Row, Table};
use crate::util::strip_currency;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use indexmap::IndexMap;
use profile::{
    ExpandProfile, Fallback, FieldSource, FieldSpec, GroupKey, HandleRule, ImageRule, MasterImage,
    SizeSource, TextRule,
};
use regex::Regex;
use std::collections::HashMap;

/// What to do with a source row whose SKU fails the expected
/// base-plus-suffix pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MismatchPolicy {
    /// Exclude the row from grouping (logged, never silent).
    Drop,
    /// Abort the run.
    Fail,
    /// Pass the row through as its own single-row group.
    Keep,
}

struct GroupedRow {
    row: Row,
    size_code: String,
}

struct Group {
    /// Style key for the cross-reference lookup, when the grouping derives
    /// one from the SKU.
    xref_key: Option<String>,
    rows: Vec<GroupedRow>,
}

/// Product-level values shared by every row a group emits.
struct RowContext {
    handle: String,
    title: String,
    body: String,
    master_image: String,
}

/// Expand a flat catalog into the profile's output row structure.
pub fn expand(
    profile: &ExpandProfile,
    rows: Vec<Row>,
    cross_ref: Option<&Table>,
    policy: MismatchPolicy,
) -> Result<Vec<Row>> {
    let xref_index = build_xref_index(profile, cross_ref);
    let groups = group_rows(profile, rows, policy)?;

    let mut out = Vec::new();
    for group in groups.into_values() {
        let primary = &group.rows[0];
        let xref_row = group
            .xref_key
            .as_deref()
            .and_then(|key| xref_index.get(key))
            .copied();
        let ctx = resolve_context(profile, &primary.row, xref_row);
        let primary_size = size_name(profile, &primary.size_code);

        out.push(render(profile.master, &primary.row, &ctx, &primary_size, None));

        if let Some(rule) = &profile.images {
            out.extend(image_rows(rule, &primary.row, &ctx, &primary_size));
        }

        for member in &group.rows[1..] {
            let member_size = size_name(profile, &member.size_code);
            out.push(render(profile.variant, &member.row, &ctx, &member_size, None));
        }
    }
    Ok(out)
}

/// Read inputs, expand, and serialize under the profile's header.
pub fn run(args: &ExpandArgs) -> Result<()> {
    let profile = args.profile.profile();
    let input = table::read_table(&args.input)
        .with_context(|| format!("load catalog {}", args.input.display()))?;
    let cross_ref = match &args.cross_ref {
        Some(path) => Some(
            table::read_table(path)
                .with_context(|| format!("load cross-reference {}", path.display()))?,
        ),
        None => None,
    };
    if profile.cross_ref.is_some() && cross_ref.is_none() {
        tracing::info!(
            profile = profile.name,
            "no cross-reference table supplied; using native description fields"
        );
    }

    let source_rows = input.rows.len();
    let rows = expand(profile, input.rows, cross_ref.as_ref(), args.on_mismatch)?;
    tracing::info!(
        profile = profile.name,
        source_rows,
        output_rows = rows.len(),
        "expanded catalog"
    );

    let columns: Vec<(String, String)> = profile
        .header
        .iter()
        .map(|column| (column.to_string(), column.to_string()))
        .collect();
    table::write_csv(&args.output, &columns, &rows)
        .with_context(|| format!("write {}", args.output.display()))?;
    Ok(())
}

fn build_xref_index<'t>(
    profile: &ExpandProfile,
    cross_ref: Option<&'t Table>,
) -> HashMap<String, &'t Row> {
    let mut index = HashMap::new();
    let (Some(rule), Some(table)) = (&profile.cross_ref, cross_ref) else {
        return index;
    };
    for row in &table.rows {
        if let Some(key) = row.get(rule.key_column) {
            if !key.is_empty() {
                // First occurrence wins, matching single-pass map building.
                index.entry(key.clone()).or_insert(row);
            }
        }
    }
    index
}

fn group_rows(
    profile: &ExpandProfile,
    rows: Vec<Row>,
    policy: MismatchPolicy,
) -> Result<IndexMap<String, Group>> {
    let mut groups: IndexMap<String, Group> = IndexMap::new();
    match profile.grouping {
        GroupKey::Columns(columns) => {
            for row in rows {
                let key = columns
                    .iter()
                    .map(|column| row.get(*column).map(String::as_str).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("-");
                let size_code = column_size(profile, &row);
                groups
                    .entry(key)
                    .or_insert_with(|| Group {
                        xref_key: None,
                        rows: Vec::new(),
                    })
                    .rows
                    .push(GroupedRow { row, size_code });
            }
        }
        GroupKey::SkuPattern {
            sku_column,
            colorway_column,
        } => {
            let pattern =
                Regex::new(r"(?i)^(.+)-[A-Z0-9]+$").context("compile SKU grouping pattern")?;
            let suffix = Regex::new(r"-(\w+)$").context("compile SKU suffix pattern")?;
            for (index, row) in rows.into_iter().enumerate() {
                let parsed = {
                    let sku = row.get(sku_column).map(String::as_str).unwrap_or("");
                    pattern.captures(sku).map(|caps| {
                        let base = caps.get(1).map_or("", |m| m.as_str());
                        let style = base.split('-').next().unwrap_or(base).to_string();
                        let size_code = suffix
                            .captures(sku)
                            .and_then(|caps| caps.get(1))
                            .map_or(String::new(), |m| m.as_str().to_string());
                        (style, size_code)
                    })
                };
                match parsed {
                    Some((style, size_code)) => {
                        let colorway = row
                            .get(colorway_column)
                            .map(String::as_str)
                            .unwrap_or("");
                        let key = format!("{style}-{colorway}");
                        groups
                            .entry(key)
                            .or_insert_with(|| Group {
                                xref_key: Some(style),
                                rows: Vec::new(),
                            })
                            .rows
                            .push(GroupedRow { row, size_code });
                    }
                    None => {
                        let sku = row.get(sku_column).map(String::as_str).unwrap_or("");
                        match policy {
                            MismatchPolicy::Drop => {
                                tracing::warn!(
                                    row = index + 1,
                                    sku,
                                    "SKU does not match base-suffix pattern; dropping row"
                                );
                            }
                            MismatchPolicy::Fail => {
                                bail!(
                                    "row {}: SKU {sku:?} does not match base-suffix pattern",
                                    index + 1
                                );
                            }
                            MismatchPolicy::Keep => {
                                tracing::warn!(
                                    row = index + 1,
                                    sku,
                                    "SKU does not match base-suffix pattern; keeping as standalone product"
                                );
                                let sku = sku.to_string();
                                groups.insert(
                                    format!("__mismatch-{index}"),
                                    Group {
                                        xref_key: Some(sku),
                                        rows: vec![GroupedRow {
                                            row,
                                            size_code: String::new(),
                                        }],
                                    },
                                );
                            }
                        }
                    }
                }
            }
        }
    }
    Ok(groups)
}

fn column_size(profile: &ExpandProfile, row: &Row) -> String {
    match profile.size {
        SizeSource::Column(column) => row.get(column).cloned().unwrap_or_default(),
        SizeSource::SkuSuffix => String::new(),
    }
}

fn size_name(profile: &ExpandProfile, code: &str) -> String {
    if profile.normalize_sizes {
        normalize_size(code).to_string()
    } else {
        code.to_string()
    }
}

fn resolve_context(profile: &ExpandProfile, primary: &Row, xref_row: Option<&Row>) -> RowContext {
    RowContext {
        handle: resolve_handle(&profile.handle, primary),
        title: resolve_text(&profile.title, primary, xref_row),
        body: resolve_text(&profile.body, primary, xref_row),
        master_image: resolve_master_image(&profile.master_image, primary),
    }
}

fn resolve_handle(rule: &HandleRule, row: &Row) -> String {
    match rule {
        HandleRule::JoinColumns(columns) => columns
            .iter()
            .map(|column| row.get(*column).map(String::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join("-"),
        HandleRule::LowercaseColumn(column) => row
            .get(*column)
            .map(|value| value.to_lowercase())
            .unwrap_or_default(),
    }
}

fn resolve_text(rule: &TextRule, row: &Row, xref_row: Option<&Row>) -> String {
    match rule {
        TextRule::Column(column) => row.get(*column).cloned().unwrap_or_default(),
        TextRule::CrossRef {
            fields,
            append_column,
            fallback,
        } => match xref_row {
            Some(xref) => {
                let mut parts: Vec<&str> = fields
                    .iter()
                    .map(|field| xref.get(*field).map(String::as_str).unwrap_or(""))
                    .collect();
                if let Some(column) = append_column {
                    parts.push(row.get(*column).map(String::as_str).unwrap_or(""));
                }
                parts.join(" ")
            }
            None => match fallback {
                Fallback::Column(column) => row.get(*column).cloned().unwrap_or_default(),
                Fallback::HeadingParagraph { heading, paragraph } => {
                    let heading = row.get(*heading).map(String::as_str).unwrap_or("");
                    let paragraph = row.get(*paragraph).map(String::as_str).unwrap_or("");
                    format!("<h1>{heading}</h1><p>{paragraph}</p>")
                }
            },
        },
    }
}

fn resolve_master_image(rule: &MasterImage, row: &Row) -> String {
    match rule {
        MasterImage::Mangled {
            base_url,
            column,
            suffix,
        } => {
            let name = row
                .get(*column)
                .map(|value| value.replace('-', "_"))
                .unwrap_or_default();
            format!("{base_url}{name}{suffix}")
        }
        MasterImage::WithSuffix {
            base_url,
            name_column,
            suffix,
        } => {
            let name = row.get(*name_column).map(String::as_str).unwrap_or("");
            format!("{base_url}{name}{suffix}")
        }
    }
}

fn image_rows(rule: &ImageRule, primary: &Row, ctx: &RowContext, size: &str) -> Vec<Row> {
    let name = primary.get(rule.name_column).map(String::as_str).unwrap_or("");
    rule.suffixes
        .iter()
        .enumerate()
        .map(|(index, suffix)| {
            let position = index / rule.per_position + 2;
            let src = format!("{}{name}{suffix}", rule.base_url);
            render(rule.template, primary, ctx, size, Some((&src, position)))
        })
        .collect()
}

fn render(
    template: &[FieldSpec],
    row: &Row,
    ctx: &RowContext,
    size: &str,
    image: Option<(&str, usize)>,
) -> Row {
    let mut out = Row::new();
    for (column, source) in template {
        let value = match source {
            FieldSource::Const(value) => value.to_string(),
            FieldSource::Column(name) => row.get(*name).cloned().unwrap_or_default(),
            FieldSource::Price(name) => {
                strip_currency(row.get(*name).map(String::as_str).unwrap_or(""))
            }
            FieldSource::JoinColumns { columns, separator } => columns
                .iter()
                .filter_map(|name| row.get(*name))
                .filter(|value| !value.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(separator),
            FieldSource::Handle => ctx.handle.clone(),
            FieldSource::Title => ctx.title.clone(),
            FieldSource::Body => ctx.body.clone(),
            FieldSource::SizeName => size.to_string(),
            FieldSource::MasterImage => ctx.master_image.clone(),
            FieldSource::ImageSrc => image.map_or(String::new(), |(src, _)| src.to_string()),
            FieldSource::ImagePosition => {
                image.map_or(String::new(), |(_, position)| position.to_string())
            }
            FieldSource::AltText {
                with_size,
                with_position,
            } => {
                let mut alt = ctx.title.clone();
                if *with_size && !size.is_empty() {
                    alt.push(' ');
                    alt.push_str(size);
                }
                alt.push_str(" Image");
                if *with_position {
                    if let Some((_, position)) = image {
                        alt.push(' ');
                        alt.push_str(&position.to_string());
                    }
                }
                alt
            }
        };
        out.insert(column.to_string(), value);
    }
    out
}
