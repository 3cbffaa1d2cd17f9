//! Prompt texts for the generation service.
//!
//! Each descriptive field has a "generate" prompt used when the field is
//! empty and an "improve" prompt used when a populated field is being
//! reworked. Classification prompts (tags, category, type) are conditioned
//! on values resolved earlier in the same row.

/// Categories offered to the category-classification prompt.
const CATEGORIES: &str =
    "Kit, Goggles, Helmets, Boots, Protection, Parts, Workshop & Tools, Stark Varg, Casual, \
     Clearance";

pub fn generate_body(title: &str) -> String {
    format!(
        "Write a detailed description, optimised for SEO and using HTML, specifically for a \
         Shopify product for the product titled \"{title}\". The content should start with an h1 \
         title and you should only return the HTML code without wrapping backticks or a language \
         identifier, and nothing else."
    )
}

pub fn improve_body(existing: &str) -> String {
    format!(
        "Improve this HTML product description for a Shopify product: \"{existing}\". Only \
         return the improved HTML and nothing else."
    )
}

pub fn generate_seo_title(title: &str) -> String {
    format!(
        "Generate an SEO-friendly title for a product titled \"{title}\" to be used in Shopify \
         as my SEO title. Please only return the title as plain text and nothing else."
    )
}

pub fn improve_seo_title(existing: &str) -> String {
    format!(
        "Improve this SEO title: \"{existing}\" and only return the improved title as plain \
         text and nothing else."
    )
}

pub fn generate_seo_description(title: &str) -> String {
    format!(
        "Write a detailed description, optimised for SEO, specifically for a Shopify product \
         for the product titled \"{title}\". You should only return the plain text description \
         and nothing else."
    )
}

pub fn improve_seo_description(existing: &str) -> String {
    format!(
        "Improve this SEO description for a Shopify product that already has the description: \
         \"{existing}\". Please only return the new SEO description as plain text and nothing \
         else."
    )
}

pub fn generate_image_alt(title: &str) -> String {
    format!(
        "Write an alt text for the product image of the product titled \"{title}\". You should \
         only return the alt text as plain text and nothing else."
    )
}

pub fn improve_image_alt(existing: &str) -> String {
    format!(
        "Improve this alt text for the product image: \"{existing}\". Please only return the \
         improved alt text as plain text and nothing else."
    )
}

pub fn tags(title: &str, body: &str, seo_title: &str, seo_description: &str) -> String {
    format!(
        "Given the product title \"{title}\", description \"{body}\", SEO title \"{seo_title}\", \
         and SEO description \"{seo_description}\", generate at least 10 related tags to be used \
         for Shopify filtering. Please only return the tags, comma separated."
    )
}

pub fn category(title: &str, body: &str) -> String {
    format!(
        "Based on the product title \"{title}\" and description \"{body}\", choose the most \
         appropriate category: {CATEGORIES}. Please only return the category name and nothing \
         else."
    )
}

pub fn product_type(title: &str, body: &str) -> String {
    format!(
        "Given the product title \"{title}\" and its description \"{body}\", list all potential \
         item collections and product types it could belong to. For example: gloves, goggles, \
         helmets, boots, protection, parts, workshop & tools, stark varg, casual, clearance. \
         Please only return the item collections and product types, comma separated, and with \
         the first letter of each word capitalized, and NOTHING else."
    )
}
