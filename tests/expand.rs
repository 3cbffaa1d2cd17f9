//! End-to-end checks for the `expand` subcommand.

mod common;

use common::{cell, read_csv, TestWorkspace};

const MADISONS_INPUT: &str = "\
Product Code,Basic Colour,Size,Description (80 Chars),Long Web Text,Brand,Category,Keywords,Stock Level,RRP,Your Price,Image Name\n\
TG100,Black,S,Trail Glove,A sturdy glove.,Madison,Gloves,\"mtb, gloves\",4,29.99,24.99,TRAIL-GLV\n\
TG100,Black,M,Trail Glove,A sturdy glove.,Madison,Gloves,\"mtb, gloves\",2,29.99,24.99,TRAIL-GLV\n\
TG200,Red,M,Road Glove,A light glove.,Madison,Gloves,\"road, gloves\",9,19.99,17.99,ROAD-GLV\n";

#[test]
fn madisons_feed_expands_into_product_sheets() {
    let ws = TestWorkspace::new();
    ws.write_csv("feed.csv", MADISONS_INPUT);

    ws.run(&[
        "expand",
        "--input",
        "feed.csv",
        "--output",
        "import.csv",
        "--profile",
        "madisons",
    ]);

    let (headers, rows) = read_csv(&ws.path("import.csv"));
    assert_eq!(headers.first().map(String::as_str), Some("Handle"));
    assert_eq!(headers.last().map(String::as_str), Some("Status"));

    // Two groups: (master + 26 image candidates + 1 variant) + (master + 26).
    assert_eq!(rows.len(), 28 + 27);

    let master = &rows[0];
    assert_eq!(cell(&headers, master, "Handle"), "TG100-Black");
    assert_eq!(cell(&headers, master, "Title"), "Trail Glove");
    assert_eq!(cell(&headers, master, "Option1 Value"), "Small");
    assert_eq!(cell(&headers, master, "Vendor"), "Madison");
    assert_eq!(cell(&headers, master, "Tags"), "mtb, gloves");
    assert_eq!(cell(&headers, master, "Image Position"), "1");
    assert_eq!(
        cell(&headers, master, "Image Src"),
        "https://store.brth.uk/moto101/TRAIL-GLV.jpeg"
    );
    assert_eq!(cell(&headers, master, "Status"), "draft");

    let first_image = &rows[1];
    assert_eq!(cell(&headers, first_image, "Handle"), "TG100-Black");
    assert_eq!(cell(&headers, first_image, "Title"), "");
    assert_eq!(cell(&headers, first_image, "Image Position"), "2");
    assert_eq!(
        cell(&headers, first_image, "Image Src"),
        "https://store.brth.uk/moto101/TRAIL-GLV-1.jpeg"
    );

    let variant = &rows[27];
    assert_eq!(cell(&headers, variant, "Handle"), "TG100-Black");
    assert_eq!(cell(&headers, variant, "Title"), "");
    assert_eq!(cell(&headers, variant, "Option1 Value"), "Medium");
    assert_eq!(cell(&headers, variant, "Variant Price"), "24.99");
    assert_eq!(cell(&headers, variant, "Variant Compare At Price"), "29.99");
    assert_eq!(cell(&headers, variant, "Variant Inventory Qty"), "2");

    let second_master = &rows[28];
    assert_eq!(cell(&headers, second_master, "Handle"), "TG200-Red");
    assert_eq!(cell(&headers, second_master, "Option1 Value"), "Medium");
}

#[test]
fn fox_feed_joins_a_cross_reference_sheet() {
    let ws = TestWorkspace::new();
    ws.write_csv(
        "feed.csv",
        "SKU code,Colorway,Material,Material Description,Material Description No Color,\
         Main Materials,Product Hierarchy Desc 2,Collection,Franchise,Retail Price GBP\n\
         ABC-RED-S,RED,31337,Flexair Jersey Red,Flexair Jersey,Polyester,Jerseys,MX24,Flexair,£49.99\n\
         ABC-RED-M,RED,31337,Flexair Jersey Red,Flexair Jersey,Polyester,Jerseys,MX24,Flexair,£49.99\n",
    );
    ws.write_csv(
        "details.csv",
        "Master,Product Name,Description,Specifications\n\
         ABC,Flexair Jersey,Light and fast.,Mesh panels.\n",
    );

    ws.run(&[
        "expand",
        "--input",
        "feed.csv",
        "--output",
        "import.csv",
        "--profile",
        "fox",
        "--cross-ref",
        "details.csv",
    ]);

    let (headers, rows) = read_csv(&ws.path("import.csv"));
    assert_eq!(rows.len(), 2);
    assert_eq!(cell(&headers, &rows[0], "Title"), "Flexair Jersey RED");
    assert_eq!(
        cell(&headers, &rows[0], "Body (HTML)"),
        "Light and fast. Mesh panels."
    );
    assert_eq!(cell(&headers, &rows[0], "Variant Price"), "49.99");
    assert_eq!(
        cell(&headers, &rows[0], "Handle"),
        cell(&headers, &rows[1], "Handle")
    );
    // Variants carry only variant-level fields.
    assert_eq!(cell(&headers, &rows[1], "Title"), "");
    assert_eq!(cell(&headers, &rows[1], "Option1 Value"), "Medium");
}

#[test]
fn mismatched_skus_fail_the_run_when_asked() {
    let ws = TestWorkspace::new();
    ws.write_csv(
        "feed.csv",
        "SKU code,Colorway,Material,Material Description,Material Description No Color,\
         Main Materials,Product Hierarchy Desc 2,Collection,Franchise,Retail Price GBP\n\
         NOSUFFIX,RED,1,x,x,x,x,x,x,1\n",
    );

    let stderr = ws.run_expecting_failure(&[
        "expand",
        "--input",
        "feed.csv",
        "--output",
        "import.csv",
        "--profile",
        "fox",
        "--on-mismatch",
        "fail",
    ]);
    assert!(stderr.contains("NOSUFFIX"), "stderr was: {stderr}");
}
