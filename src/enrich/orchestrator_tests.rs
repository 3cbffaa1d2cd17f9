use super::*;
use std::collections::VecDeque;

/// Generator with scripted outcomes; records every prompt it receives.
struct ScriptedGenerator {
    responses: VecDeque<Result<String, GenerationError>>,
    prompts: Vec<String>,
}

impl ScriptedGenerator {
    fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses: responses.into(),
            prompts: Vec::new(),
        }
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&mut self, prompt: &str, _max_tokens: u32) -> Result<String, GenerationError> {
        self.prompts.push(prompt.to_string());
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Failed(anyhow::anyhow!("script exhausted"))))
    }
}

fn fast_options() -> EnrichOptions {
    EnrichOptions {
        row_delay: Duration::ZERO,
        backoff_floor: Duration::ZERO,
        backoff_ceiling: Duration::ZERO,
        ..EnrichOptions::default()
    }
}

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn bare_row() -> Row {
    row(&[("Handle", "FX 180 Jersey"), ("Title", "fx 180 jersey")])
}

#[test]
fn generates_missing_fields_in_pipeline_order() {
    let generator = ScriptedGenerator::new(vec![
        Ok("<h1>FX 180</h1>".to_string()),
        Ok("FX 180 Jersey | Moto Gear".to_string()),
        Ok("A great jersey.".to_string()),
        Ok("Rider wearing the FX 180 jersey".to_string()),
        Ok("jersey, motocross, fox".to_string()),
        Ok("Kit".to_string()),
        Ok("jerseys, casual".to_string()),
    ]);
    let mut rows = vec![bare_row()];
    let mut enricher = Enricher::new(generator, fast_options());
    enricher.process(&mut rows);

    let enriched = &rows[0];
    assert_eq!(enriched["Handle"], "fx-180-jersey");
    assert_eq!(enriched["Body (HTML)"], "<h1>FX 180</h1>");
    assert_eq!(enriched["SEO Title"], "FX 180 Jersey | Moto Gear");
    assert_eq!(enriched["SEO Description"], "A great jersey.");
    assert_eq!(enriched["Image Alt Text"], "Rider wearing the FX 180 jersey");
    assert_eq!(enriched["Tags"], "Jersey, Motocross, Fox");
    assert_eq!(enriched["Product Category"], "Kit");
    assert_eq!(enriched["Type"], "Jerseys, Casual");
    assert_eq!(enriched["Title"], "Fx 180 jersey");

    let prompts = &enricher.generator.prompts;
    assert_eq!(prompts.len(), 7);
    assert!(prompts[0].contains("fx 180 jersey"));
    // The tags prompt is conditioned on the fields resolved just before it.
    assert!(prompts[4].contains("<h1>FX 180</h1>"));
    assert!(prompts[4].contains("A great jersey."));
}

#[test]
fn generate_only_policy_is_idempotent_on_populated_rows() {
    let populated = row(&[
        ("Handle", "fx-180-jersey"),
        ("Title", "Fx 180 jersey"),
        ("Body (HTML)", "<h1>FX 180</h1>"),
        ("SEO Title", "FX 180 Jersey"),
        ("SEO Description", "A great jersey."),
        ("Image Alt Text", "Rider in jersey"),
        ("Tags", "Jersey, Motocross"),
        ("Product Category", "Kit"),
        ("Type", "Jerseys"),
        ("Variant Price", "49.99"),
    ]);
    let mut rows = vec![populated.clone()];
    let mut enricher = Enricher::new(ScriptedGenerator::new(Vec::new()), fast_options());
    enricher.process(&mut rows);

    assert!(enricher.generator.prompts.is_empty(), "no calls expected");
    assert_eq!(rows[0], populated);
}

#[test]
fn improve_policy_reworks_populated_fields() {
    let options = EnrichOptions {
        policy: FieldPolicy::ImproveIfPresent,
        classify: false,
        ..fast_options()
    };
    let generator = ScriptedGenerator::new(vec![
        Ok("better body".to_string()),
        Ok("better seo title".to_string()),
        Ok("better seo description".to_string()),
        Ok("better alt".to_string()),
    ]);
    let mut rows = vec![row(&[
        ("Handle", "fx-180"),
        ("Title", "FX 180"),
        ("Body (HTML)", "old body"),
        ("SEO Title", "old title"),
        ("SEO Description", "old description"),
        ("Image Alt Text", "old alt"),
    ])];
    let mut enricher = Enricher::new(generator, options);
    enricher.process(&mut rows);

    assert_eq!(rows[0]["Body (HTML)"], "better body");
    assert_eq!(rows[0]["SEO Title"], "better seo title");
    assert!(enricher.generator.prompts[1].contains("old title"));
}

#[test]
fn failed_improve_keeps_the_existing_value() {
    let options = EnrichOptions {
        policy: FieldPolicy::ImproveIfPresent,
        classify: false,
        ..fast_options()
    };
    let generator = ScriptedGenerator::new(vec![Err(GenerationError::Failed(anyhow::anyhow!(
        "service unavailable"
    )))]);
    let mut rows = vec![row(&[
        ("Title", "FX 180"),
        ("Body (HTML)", "original body"),
    ])];
    Enricher::new(generator, options).process(&mut rows);
    assert_eq!(rows[0]["Body (HTML)"], "original body");
}

#[test]
fn blank_policy_clears_populated_fields_without_calls() {
    let options = EnrichOptions {
        policy: FieldPolicy::BlankIfPresent,
        classify: false,
        ..fast_options()
    };
    let mut rows = vec![row(&[
        ("Title", "FX 180"),
        ("Body (HTML)", "old body"),
        ("SEO Title", "old title"),
        ("SEO Description", ""),
        ("Image Alt Text", "old alt"),
    ])];
    let generator = ScriptedGenerator::new(vec![Ok("fresh description".to_string())]);
    let mut enricher = Enricher::new(generator, options);
    enricher.process(&mut rows);

    assert_eq!(rows[0]["Body (HTML)"], "");
    assert_eq!(rows[0]["SEO Title"], "");
    assert_eq!(rows[0]["Image Alt Text"], "");
    // The one empty field still gets generated.
    assert_eq!(rows[0]["SEO Description"], "fresh description");
    assert_eq!(enricher.generator.prompts.len(), 1);
}

#[test]
fn rate_limit_retries_until_success_and_resets_backoff() {
    let options = EnrichOptions {
        classify: false,
        backoff_floor: Duration::from_nanos(1),
        backoff_ceiling: Duration::from_micros(1),
        ..fast_options()
    };
    let generator = ScriptedGenerator::new(vec![
        Err(GenerationError::RateLimited),
        Err(GenerationError::RateLimited),
        Ok("generated body".to_string()),
        Ok("seo title".to_string()),
        Ok("seo description".to_string()),
        Ok("alt text".to_string()),
    ]);
    let mut rows = vec![row(&[("Title", "FX 180")])];
    let mut enricher = Enricher::new(generator, options);
    enricher.process(&mut rows);

    assert_eq!(rows[0]["Body (HTML)"], "generated body");
    // Same prompt retried identically, then one call per remaining field.
    assert_eq!(enricher.generator.prompts.len(), 6);
    assert_eq!(enricher.generator.prompts[0], enricher.generator.prompts[2]);
    assert_eq!(enricher.backoff.current(), Duration::from_nanos(1));
}

#[test]
fn sustained_rate_limiting_abandons_the_field() {
    let options = EnrichOptions {
        classify: false,
        max_attempts: 3,
        ..fast_options()
    };
    let generator = ScriptedGenerator::new(vec![
        Err(GenerationError::RateLimited),
        Err(GenerationError::RateLimited),
        Err(GenerationError::RateLimited),
        Ok("seo title".to_string()),
        Ok("seo description".to_string()),
        Ok("alt text".to_string()),
    ]);
    let mut rows = vec![row(&[("Title", "FX 180")])];
    let mut enricher = Enricher::new(generator, options);
    enricher.process(&mut rows);

    assert!(rows[0].get("Body (HTML)").is_none());
    assert_eq!(rows[0]["SEO Title"], "seo title");
    let prompts = &enricher.generator.prompts;
    assert_eq!(prompts.len(), 6);
    assert_eq!(prompts[0], prompts[2]);
}

#[test]
fn price_cleanup_and_scrubbing() {
    let options = EnrichOptions {
        scrub_ascii: true,
        classify: false,
        ..fast_options()
    };
    let mut rows = vec![row(&[
        ("Title", "FX 180"),
        ("Body (HTML)", "fancy – dash"),
        ("SEO Title", "\"Quoted title\""),
        ("SEO Description", "desc"),
        ("Image Alt Text", "alt"),
        ("Type", "\"gloves\""),
        ("Variant Price", "£49.99"),
    ])];
    Enricher::new(ScriptedGenerator::new(Vec::new()), options).process(&mut rows);

    assert_eq!(rows[0]["Body (HTML)"], "fancy  dash");
    assert_eq!(rows[0]["SEO Title"], "Quoted title");
    assert_eq!(rows[0]["Type"], "Gloves");
    assert_eq!(rows[0]["Variant Price"], "49.99");
}

#[test]
fn unparseable_price_becomes_empty_not_a_crash() {
    let mut rows = vec![row(&[("Variant Price", "call us")])];
    Enricher::new(ScriptedGenerator::new(Vec::new()), fast_options()).process(&mut rows);
    assert_eq!(rows[0]["Variant Price"], "");
}

#[test]
fn default_output_path_tags_the_input_name() {
    let path = default_output_path(Path::new("/data/catalog.csv"));
    let name = path.file_name().and_then(|n| n.to_str()).expect("name");
    assert!(name.starts_with("catalog-processed-"));
    assert!(name.ends_with(".csv"));
}
