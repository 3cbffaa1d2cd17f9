//! Catalog profiles for the variant expander.
//!
//! Each supplier feed differs in grouping key, column names, image naming,
//! and which output columns a master/variant/image row carries. Those quirks
//! live here as data; the emission algorithm itself is shared and lives in
//! the parent module.
//!
//! Templates list only the populated output columns. Anything absent from a
//! template serializes as an empty field, which is how the storefront
//! recognizes "same product, new variant" rows.

use clap::ValueEnum;

/// How source rows cluster into one logical product.
#[derive(Debug, Clone, Copy)]
pub enum GroupKey {
    /// Join the named column values with `-`.
    Columns(&'static [&'static str]),
    /// Parse the SKU column as `base-SUFFIX`; group by the base's leading
    /// style segment combined with a colorway column. Rows whose SKU does
    /// not match the pattern are handled per the mismatch policy.
    SkuPattern {
        sku_column: &'static str,
        colorway_column: &'static str,
    },
}

/// Where a row's size code comes from.
#[derive(Debug, Clone, Copy)]
pub enum SizeSource {
    Column(&'static str),
    /// The trailing `-SUFFIX` segment of the SKU column named in
    /// [`GroupKey::SkuPattern`].
    SkuSuffix,
}

/// How the product handle is derived from a source row.
#[derive(Debug, Clone, Copy)]
pub enum HandleRule {
    /// Join the named columns with `-`, as-is.
    JoinColumns(&'static [&'static str]),
    /// Lowercase a single column.
    LowercaseColumn(&'static str),
}

/// Native fallback for title/body when no cross-reference row matches.
#[derive(Debug, Clone, Copy)]
pub enum Fallback {
    Column(&'static str),
    /// `<h1>{heading}</h1><p>{paragraph}</p>` from two source columns.
    HeadingParagraph {
        heading: &'static str,
        paragraph: &'static str,
    },
}

/// How a product-level text field (title, body) resolves.
#[derive(Debug, Clone, Copy)]
pub enum TextRule {
    Column(&'static str),
    /// Space-join the named cross-reference fields, optionally appending a
    /// source column; fall back to native fields when the lookup misses.
    CrossRef {
        fields: &'static [&'static str],
        append_column: Option<&'static str>,
        fallback: Fallback,
    },
}

/// Image source for the master row itself (position 1).
#[derive(Debug, Clone, Copy)]
pub enum MasterImage {
    /// `{base_url}{column with - replaced by _}{suffix}`.
    Mangled {
        base_url: &'static str,
        column: &'static str,
        suffix: &'static str,
    },
    /// `{base_url}{name_column}{suffix}`.
    WithSuffix {
        base_url: &'static str,
        name_column: &'static str,
        suffix: &'static str,
    },
}

/// One output field: the column it lands in and where its value comes from.
pub type FieldSpec = (&'static str, FieldSource);

/// Value sources available to row templates.
#[derive(Debug, Clone, Copy)]
pub enum FieldSource {
    Const(&'static str),
    /// Copy a source column verbatim.
    Column(&'static str),
    /// Source column run through currency stripping.
    Price(&'static str),
    /// Join several source columns, skipping empties.
    JoinColumns {
        columns: &'static [&'static str],
        separator: &'static str,
    },
    Handle,
    Title,
    Body,
    /// Normalized size option value for the row being emitted.
    SizeName,
    /// The master row's own image source.
    MasterImage,
    /// Current image candidate URL (image rows only).
    ImageSrc,
    /// Current image position (image rows only).
    ImagePosition,
    /// `"{title} [{size} ]Image[ {position}]"`.
    AltText {
        with_size: bool,
        with_position: bool,
    },
}

/// Extra image rows attached to a group's primary item.
#[derive(Debug, Clone, Copy)]
pub struct ImageRule {
    pub base_url: &'static str,
    pub name_column: &'static str,
    /// Ordered filename-suffix candidates; each yields one image row.
    pub suffixes: &'static [&'static str],
    /// Candidates per image position; position is
    /// `candidate_index / per_position + 2` (1 is the master's own image).
    pub per_position: usize,
    pub template: &'static [FieldSpec],
}

/// Optional secondary cross-reference table, keyed by the style segment the
/// grouping derives from the SKU.
#[derive(Debug, Clone, Copy)]
pub struct CrossRef {
    /// Key column in the cross-reference table.
    pub key_column: &'static str,
}

/// Everything the expander needs to know about one catalog shape.
#[derive(Debug, Clone, Copy)]
pub struct ExpandProfile {
    pub name: &'static str,
    pub grouping: GroupKey,
    pub handle: HandleRule,
    pub title: TextRule,
    pub body: TextRule,
    pub size: SizeSource,
    /// Whether size codes go through the normalization table.
    pub normalize_sizes: bool,
    /// Ordered output header; ids double as display titles.
    pub header: &'static [&'static str],
    pub master: &'static [FieldSpec],
    pub variant: &'static [FieldSpec],
    pub master_image: MasterImage,
    pub images: Option<ImageRule>,
    pub cross_ref: Option<CrossRef>,
}

/// CLI-selectable profile names.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProfileName {
    /// Fox Racing apparel feed (XLSX plus product-copy cross-reference).
    Fox,
    /// Madisons feed grouped by product code and colour, with image rows.
    Madisons,
    /// Madisons feed grouped by commodity code, full storefront column set.
    MadisonsFlat,
}

impl ProfileName {
    pub fn profile(self) -> &'static ExpandProfile {
        match self {
            ProfileName::Fox => &FOX,
            ProfileName::Madisons => &MADISONS,
            ProfileName::MadisonsFlat => &MADISONS_FLAT,
        }
    }
}

use FieldSource as F;

pub static FOX: ExpandProfile = ExpandProfile {
    name: "fox",
    grouping: GroupKey::SkuPattern {
        sku_column: "SKU code",
        colorway_column: "Colorway",
    },
    handle: HandleRule::JoinColumns(&["Material", "Colorway"]),
    title: TextRule::CrossRef {
        fields: &["Product Name"],
        append_column: Some("Colorway"),
        fallback: Fallback::Column("Material Description"),
    },
    body: TextRule::CrossRef {
        fields: &["Description", "Specifications"],
        append_column: None,
        fallback: Fallback::HeadingParagraph {
            heading: "Material Description No Color",
            paragraph: "Main Materials",
        },
    },
    size: SizeSource::SkuSuffix,
    normalize_sizes: true,
    header: &[
        "Handle",
        "Title",
        "Body (HTML)",
        "Vendor",
        "Type",
        "Tags",
        "Published",
        "Option1 Name",
        "Option1 Value",
        "Variant SKU",
        "Variant Inventory Qty",
        "Variant Price",
        "Variant Compare At Price",
        "Variant Requires Shipping",
        "Variant Taxable",
        "Image Src",
        "Image Alt Text",
        "Status",
    ],
    master: &[
        ("Handle", F::Handle),
        ("Title", F::Title),
        ("Body (HTML)", F::Body),
        ("Vendor", F::Const("Fox")),
        ("Type", F::Column("Product Hierarchy Desc 2")),
        (
            "Tags",
            F::JoinColumns {
                columns: &[
                    "Collection",
                    "Franchise",
                    "Product Hierarchy Desc 3",
                    "Product Hierarchy Desc 4",
                    "Product Hierarchy Desc 5",
                    "Product Hierarchy Desc 6",
                ],
                separator: ", ",
            },
        ),
        ("Published", F::Const("TRUE")),
        ("Option1 Name", F::Const("Size")),
        ("Option1 Value", F::SizeName),
        ("Variant SKU", F::Column("SKU code")),
        ("Variant Inventory Qty", F::Const("0")),
        ("Variant Price", F::Price("Retail Price GBP")),
        ("Variant Requires Shipping", F::Const("TRUE")),
        ("Variant Taxable", F::Const("TRUE")),
        ("Image Src", F::MasterImage),
        (
            "Image Alt Text",
            F::AltText {
                with_size: true,
                with_position: false,
            },
        ),
        ("Status", F::Const("active")),
    ],
    variant: &[
        ("Handle", F::Handle),
        ("Option1 Value", F::SizeName),
        ("Variant SKU", F::Column("SKU code")),
        ("Variant Inventory Qty", F::Const("0")),
        ("Variant Price", F::Price("Retail Price GBP")),
        ("Variant Requires Shipping", F::Const("TRUE")),
        ("Variant Taxable", F::Const("TRUE")),
    ],
    master_image: MasterImage::Mangled {
        base_url: "https://moto101.r2.cnnct.co.uk/",
        column: "Material",
        suffix: "_1.png",
    },
    images: None,
    cross_ref: Some(CrossRef {
        key_column: "Master",
    }),
};

pub static MADISONS: ExpandProfile = ExpandProfile {
    name: "madisons",
    grouping: GroupKey::Columns(&["Product Code", "Basic Colour"]),
    handle: HandleRule::JoinColumns(&["Product Code", "Basic Colour"]),
    title: TextRule::Column("Description (80 Chars)"),
    body: TextRule::Column("Long Web Text"),
    size: SizeSource::Column("Size"),
    normalize_sizes: true,
    header: &[
        "Handle",
        "Title",
        "Body (HTML)",
        "Vendor",
        "Product Category",
        "Tags",
        "Published",
        "Option1 Name",
        "Option1 Value",
        "Variant SKU",
        "Variant Inventory Qty",
        "Variant Price",
        "Variant Compare At Price",
        "Variant Requires Shipping",
        "Variant Taxable",
        "Image Src",
        "Image Position",
        "Image Alt Text",
        "Status",
    ],
    master: &[
        ("Handle", F::Handle),
        ("Title", F::Title),
        ("Body (HTML)", F::Body),
        ("Vendor", F::Column("Brand")),
        ("Product Category", F::Column("Category")),
        ("Tags", F::Column("Keywords")),
        ("Published", F::Const("TRUE")),
        ("Option1 Name", F::Const("Size")),
        ("Option1 Value", F::SizeName),
        ("Variant SKU", F::Column("Product Code")),
        ("Variant Inventory Qty", F::Column("Stock Level")),
        ("Variant Price", F::Price("RRP")),
        ("Variant Compare At Price", F::Price("RRP")),
        ("Variant Requires Shipping", F::Const("TRUE")),
        ("Variant Taxable", F::Const("TRUE")),
        ("Image Src", F::MasterImage),
        ("Image Position", F::Const("1")),
        (
            "Image Alt Text",
            F::AltText {
                with_size: true,
                with_position: false,
            },
        ),
        ("Status", F::Const("draft")),
    ],
    variant: &[
        ("Handle", F::Handle),
        ("Option1 Value", F::SizeName),
        ("Variant SKU", F::Column("Product Code")),
        ("Variant Inventory Qty", F::Column("Stock Level")),
        ("Variant Price", F::Price("Your Price")),
        ("Variant Compare At Price", F::Price("RRP")),
        ("Variant Requires Shipping", F::Const("TRUE")),
        ("Variant Taxable", F::Const("TRUE")),
    ],
    master_image: MasterImage::WithSuffix {
        base_url: "https://store.brth.uk/moto101/",
        name_column: "Image Name",
        suffix: ".jpeg",
    },
    images: Some(ImageRule {
        base_url: "https://store.brth.uk/moto101/",
        name_column: "Image Name",
        suffixes: &[
            "-1.jpeg", "-1.jpg", "-2.png", "-2.jpeg", "-2.jpg", "-3.png", "-3.jpeg", "-3.jpg",
            "-4.png", "-4.jpeg", "-4.jpg", "-5.png", "-5.jpeg", "-5.jpg", "-6.png", "-6.jpeg",
            "-6.jpg", "-7.png", "-7.jpeg", "-7.jpg", "-8.png", "-8.jpeg", "-8.jpg", "-9.png",
            "-9.jpeg", "-9.jpg",
        ],
        per_position: 3,
        template: &[
            ("Handle", F::Handle),
            ("Published", F::Const("TRUE")),
            ("Image Src", F::ImageSrc),
            ("Image Position", F::ImagePosition),
            (
                "Image Alt Text",
                F::AltText {
                    with_size: false,
                    with_position: true,
                },
            ),
            ("Status", F::Const("draft")),
        ],
    }),
    cross_ref: None,
};

pub static MADISONS_FLAT: ExpandProfile = ExpandProfile {
    name: "madisons-flat",
    grouping: GroupKey::Columns(&["Commodity Code"]),
    handle: HandleRule::LowercaseColumn("Product Code"),
    title: TextRule::Column("Description (80 Chars)"),
    body: TextRule::Column("Long Web Text"),
    size: SizeSource::Column("Size"),
    normalize_sizes: false,
    header: &[
        "Handle",
        "Title",
        "Body (HTML)",
        "Vendor",
        "Product Category",
        "Type",
        "Tags",
        "Published",
        "Option1 Name",
        "Option1 Value",
        "Option2 Name",
        "Option2 Value",
        "Option3 Name",
        "Option3 Value",
        "Variant SKU",
        "Variant Grams",
        "Variant Inventory Tracker",
        "Variant Inventory Qty",
        "Variant Inventory Policy",
        "Variant Fulfillment Service",
        "Variant Price",
        "Variant Compare At Price",
        "Variant Requires Shipping",
        "Variant Taxable",
        "Variant Barcode",
        "Image Src",
        "Image Position",
        "Image Alt Text",
        "Gift Card",
        "SEO Title",
        "SEO Description",
        "Google Shopping / Google Product Category",
        "Google Shopping / Gender",
        "Google Shopping / Age Group",
        "Google Shopping / MPN",
        "Google Shopping / AdWords Grouping",
        "Google Shopping / AdWords Labels",
        "Google Shopping / Condition",
        "Google Shopping / Custom Product",
        "Google Shopping / Custom Label 0",
        "Google Shopping / Custom Label 1",
        "Google Shopping / Custom Label 2",
        "Google Shopping / Custom Label 3",
        "Google Shopping / Custom Label 4",
        "Variant Image",
        "Variant Weight Unit",
        "Variant Tax Code",
        "Cost per item",
        "Price / International",
        "Compare At Price / International",
        "Status",
    ],
    master: &[
        ("Handle", F::Handle),
        ("Title", F::Title),
        ("Body (HTML)", F::Body),
        ("Vendor", F::Column("Brand")),
        ("Published", F::Const("TRUE")),
        ("Option1 Name", F::Const("Size")),
        ("Option1 Value", F::SizeName),
        ("Option2 Name", F::Const("Color")),
        ("Option2 Value", F::Column("Basic Colour")),
        ("Variant SKU", F::Column("Product Code")),
        ("Variant Price", F::Price("RRP")),
        ("Variant Requires Shipping", F::Const("TRUE")),
        ("Variant Taxable", F::Const("TRUE")),
        ("Variant Barcode", F::Column("Barcode")),
        ("Image Src", F::MasterImage),
        ("Image Position", F::Const("1")),
        (
            "Image Alt Text",
            F::AltText {
                with_size: true,
                with_position: false,
            },
        ),
        ("Status", F::Const("active")),
    ],
    variant: &[
        ("Handle", F::Handle),
        ("Option1 Value", F::SizeName),
        ("Option2 Value", F::Column("Basic Colour")),
        ("Variant SKU", F::Column("Product Code")),
        ("Variant Price", F::Price("RRP")),
        ("Variant Requires Shipping", F::Const("TRUE")),
        ("Variant Taxable", F::Const("TRUE")),
        ("Variant Barcode", F::Column("Barcode")),
    ],
    master_image: MasterImage::WithSuffix {
        base_url: "https://store.brth.uk/moto101/",
        name_column: "Image Name",
        suffix: ".jpeg",
    },
    images: Some(ImageRule {
        base_url: "https://store.brth.uk/moto101/",
        name_column: "Image Name",
        suffixes: &[".jpeg", ".jpg", ".png"],
        per_position: 3,
        template: &[
            ("Handle", F::Handle),
            ("Image Src", F::ImageSrc),
            ("Image Position", F::ImagePosition),
            (
                "Image Alt Text",
                F::AltText {
                    with_size: true,
                    with_position: true,
                },
            ),
        ],
    }),
    cross_ref: None,
};
