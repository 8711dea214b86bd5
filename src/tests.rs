use super::*;
use crate::schema::{schema_for, FieldKind};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

fn templates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")
}

fn renderer() -> SlideRenderer {
    SlideRenderer::new(&templates_dir()).expect("Failed to create renderer")
}

fn items_of(kind: schema::ItemKind, count: usize) -> Value {
    let entries: Vec<Value> = (0..count)
        .map(|i| {
            let mut entry = Map::new();
            for field in kind.fields() {
                entry.insert(
                    field.name.to_string(),
                    Value::String(format!("{} {}", field.name, i + 1)),
                );
            }
            Value::Object(entry)
        })
        .collect();
    Value::Array(entries)
}

/// Minimal valid content for a slide type, built from its schema with every
/// list field at its lower cardinality bound.
fn minimal_content(slide_type: SlideType) -> Value {
    let mut content = Map::new();
    for field in schema_for(slide_type).fields {
        let value = match field.kind {
            FieldKind::Text { .. } => Value::String(format!("sample {}", field.name)),
            FieldKind::List { item, min_items, .. } => items_of(item, min_items),
        };
        content.insert(field.name.to_string(), value);
    }
    Value::Object(content)
}

#[test]
fn test_all_slide_types_validate_minimal_content() {
    for slide_type in SlideType::ALL {
        let content = minimal_content(slide_type);
        let result = validate(slide_type, &content);
        assert!(result.is_ok(), "{} failed: {:?}", slide_type, result.err());
    }
}

#[test]
fn test_cardinality_bounds_are_enforced() {
    for slide_type in SlideType::ALL {
        for field in schema_for(slide_type).fields {
            let FieldKind::List { item, min_items, max_items } = field.kind else {
                continue;
            };

            // One fewer than the minimum
            if min_items > 0 {
                let mut content = minimal_content(slide_type);
                content[field.name] = items_of(item, min_items - 1);
                let err = validate(slide_type, &content).unwrap_err();
                assert!(
                    matches!(err, DeckError::CardinalityError { .. }),
                    "{} {} under-count: {:?}",
                    slide_type,
                    field.name,
                    err
                );
            }

            // One more than the maximum
            let mut content = minimal_content(slide_type);
            content[field.name] = items_of(item, max_items + 1);
            let err = validate(slide_type, &content).unwrap_err();
            assert!(
                matches!(err, DeckError::CardinalityError { .. }),
                "{} {} over-count: {:?}",
                slide_type,
                field.name,
                err
            );
        }
    }
}

#[test]
fn test_text_length_boundary() {
    // Exactly at the limit passes
    let content = json!({"title": "x".repeat(80), "subtitle": "Intro"});
    assert!(validate(SlideType::TitleSlide, &content).is_ok());

    // One character over fails
    let content = json!({"title": "x".repeat(81), "subtitle": "Intro"});
    let err = validate(SlideType::TitleSlide, &content).unwrap_err();
    match err {
        DeckError::FieldTooLong { field, limit, actual, .. } => {
            assert_eq!(field, "title");
            assert_eq!(limit, 80);
            assert_eq!(actual, 81);
        }
        other => panic!("Expected FieldTooLong, got {:?}", other),
    }
}

#[test]
fn test_length_is_measured_in_characters_not_bytes() {
    // 80 multi-byte characters are within an 80-character limit
    let content = json!({"title": "한".repeat(80), "subtitle": "Intro"});
    assert!(validate(SlideType::TitleSlide, &content).is_ok());
}

#[test]
fn test_missing_field_is_reported() {
    let content = json!({"title": "Only a title"});
    let err = validate(SlideType::TitleSlide, &content).unwrap_err();
    match err {
        DeckError::MissingField { field, .. } => assert_eq!(field, "subtitle"),
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_type_mismatch_on_non_list_items() {
    let content = json!({"title": "List", "items": "not a list"});
    let err = validate(SlideType::TwoColumnList, &content).unwrap_err();
    assert!(matches!(err, DeckError::TypeMismatch { .. }));
}

#[test]
fn test_type_mismatch_on_non_object_content() {
    let err = validate(SlideType::TitleSlide, &json!(["not", "an", "object"])).unwrap_err();
    assert!(matches!(err, DeckError::TypeMismatch { .. }));
}

#[test]
fn test_nested_item_errors_carry_paths() {
    let content = json!({
        "title": "Metrics",
        "description": "About the data",
        "metrics": [
            {"value": "61%", "label": "Metric 1"},
            {"value": "56%", "label": "Metric 2"},
            {"value": "55%"},
            {"value": "48%", "label": "Metric 4"},
        ],
    });
    let err = validate(SlideType::MetricsGrid, &content).unwrap_err();
    match err {
        DeckError::MissingField { field, .. } => assert_eq!(field, "metrics[2].label"),
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_extra_fields_are_dropped_and_order_normalized() {
    let content = json!({
        "subtitle": "Intro",
        "speaker_notes": "should disappear",
        "title": "My Presentation",
    });
    let normalized = validate(SlideType::TitleSlide, &content).unwrap();
    let keys: Vec<&String> = normalized.keys().collect();
    assert_eq!(keys, ["title", "subtitle"]);
    assert!(!normalized.contains_key("speaker_notes"));
}

#[test]
fn test_validate_tagged_rejects_unknown_tag() {
    let err = validate_tagged("pie_chart", &json!({})).unwrap_err();
    match err {
        DeckError::UnknownSlideType(tag) => assert_eq!(tag, "pie_chart"),
        other => panic!("Expected UnknownSlideType, got {:?}", other),
    }
}

#[test]
fn test_slide_type_tags_round_trip() {
    for slide_type in SlideType::ALL {
        assert_eq!(SlideType::parse_tag(slide_type.as_tag()).unwrap(), slide_type);
        // The serde representation must agree with the tag string
        assert_eq!(serde_json::to_value(slide_type).unwrap(), json!(slide_type.as_tag()));
    }
}

#[test]
fn test_json_schema_carries_limits() {
    let schema = schema::json_schema(SlideType::TitleSlide);
    assert_eq!(schema["properties"]["title"]["maxLength"], json!(80));
    assert_eq!(schema["required"], json!(["title", "subtitle"]));

    let schema = schema::json_schema(SlideType::MetricsGrid);
    assert_eq!(schema["properties"]["metrics"]["minItems"], json!(4));
    assert_eq!(schema["properties"]["metrics"]["maxItems"], json!(4));
}

#[test]
fn test_schema_catalog_covers_all_types() {
    let catalog = schema::schema_catalog();
    assert_eq!(catalog.as_object().unwrap().len(), 14);
    assert!(catalog.get("quote").is_some());
}

#[test]
fn test_render_title_slide() {
    let content = json!({"title": "My Presentation", "subtitle": "Intro"});
    let markdown = renderer().render(SlideType::TitleSlide, &content, true).unwrap();
    assert!(markdown.contains("# My Presentation"));
    assert!(markdown.contains("## Intro"));
}

#[test]
fn test_render_all_slide_types() {
    let renderer = renderer();
    for slide_type in SlideType::ALL {
        let content = minimal_content(slide_type);
        let markdown = renderer.render(slide_type, &content, true).unwrap();
        assert!(!markdown.trim().is_empty(), "{} rendered empty", slide_type);
    }
}

#[test]
fn test_render_is_idempotent() {
    let renderer = renderer();
    let content = minimal_content(SlideType::VerticalList);
    let first = renderer.render(SlideType::VerticalList, &content, true).unwrap();
    let second = renderer.render(SlideType::VerticalList, &content, true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_render_list_expands_every_item() {
    let content = json!({
        "title": "Three things",
        "items": [
            {"title": "First", "description": "One"},
            {"title": "Second", "description": "Two"},
            {"title": "Third", "description": "Three"},
        ],
    });
    let markdown = renderer()
        .render(SlideType::Horizontal3ColumnList, &content, true)
        .unwrap();
    assert_eq!(markdown.matches("list-item").count(), 3);
    assert!(markdown.contains("<h3>Second</h3>"));
}

#[test]
fn test_render_rejects_invalid_content_when_validating() {
    let content = json!({"title": "x".repeat(81), "subtitle": "Intro"});
    let err = renderer().render(SlideType::TitleSlide, &content, true).unwrap_err();
    assert!(matches!(err, DeckError::FieldTooLong { .. }));
}

#[test]
fn test_render_skips_validation_when_disabled() {
    // Trusted-caller escape hatch: overlong content still renders
    let content = json!({"title": "x".repeat(81), "subtitle": "Intro"});
    let markdown = renderer().render(SlideType::TitleSlide, &content, false).unwrap();
    assert!(markdown.contains(&"x".repeat(81)));
}

#[test]
fn test_renderer_requires_template_dir() {
    let missing = Path::new("/nonexistent/template/dir");
    let err = SlideRenderer::new(missing).unwrap_err();
    assert!(matches!(err, DeckError::TemplateDirNotFound(_)));
}

fn sample_records(count: usize) -> Vec<SlideRecord> {
    (0..count)
        .map(|i| SlideRecord {
            slide_type: "section_title".to_string(),
            content: json!({"title": format!("Section {}", i + 1)}),
        })
        .collect()
}

#[test]
fn test_presentation_joins_with_single_separators() {
    let records = sample_records(4);
    let markdown = renderer().render_presentation(&records, true, false).unwrap();
    assert_eq!(markdown.matches(SLIDE_SEPARATOR).count(), 3);
    assert!(!markdown.starts_with(SLIDE_SEPARATOR));
    assert!(!markdown.ends_with(SLIDE_SEPARATOR));
}

#[test]
fn test_presentation_prepends_frontmatter() {
    let records = sample_records(2);
    let markdown = renderer().render_presentation(&records, true, true).unwrap();
    assert!(markdown.starts_with(FRONTMATTER));
    assert!(markdown.contains("marp: true"));
    assert!(markdown.contains("theme: custom-style"));
}

#[test]
fn test_presentation_failure_identifies_index_and_tag() {
    let mut records = sample_records(3);
    records[2].slide_type = "mystery_slide".to_string();
    let err = renderer().render_presentation(&records, true, false).unwrap_err();
    match err {
        DeckError::SlideRenderFailed { index, slide_type, source } => {
            assert_eq!(index, 2);
            assert_eq!(slide_type, "mystery_slide");
            assert!(matches!(*source, DeckError::UnknownSlideType(_)));
        }
        other => panic!("Expected SlideRenderFailed, got {:?}", other),
    }
}

#[test]
fn test_presentation_validation_failure_in_middle() {
    let mut records = sample_records(3);
    records[1].content = json!({"title": "x".repeat(61)});
    let err = renderer().render_presentation(&records, true, false).unwrap_err();
    match err {
        DeckError::SlideRenderFailed { index, .. } => assert_eq!(index, 1),
        other => panic!("Expected SlideRenderFailed, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Paper adapter
// ---------------------------------------------------------------------------

fn sample_paper() -> Value {
    json!({
        "title": "Attention Is All You Need",
        "sections": {
            "abstract": "Transformers rely entirely on attention.",
            "method": [
                {
                    "header_id": "S3",
                    "paragraphs": ["Encoder stacks.", "Decoder stacks."],
                    "figures": [
                        {
                            "figure_id": "S3.F1",
                            "absolute_url": "https://example.com/fig1.png",
                            "caption": "Model architecture"
                        }
                    ]
                }
            ],
            "performance": [
                {"paragraphs": ["BLEU improves."], "figures": []}
            ],
            "conclusion": "Attention wins."
        }
    })
}

#[test]
fn test_paper_context_flattens_both_section_shapes() {
    let paper = PaperContext::from_value(&sample_paper());
    assert_eq!(paper.title, "Attention Is All You Need");
    assert_eq!(paper.abstract_text, "Transformers rely entirely on attention.");
    assert_eq!(paper.method, "Encoder stacks. Decoder stacks.");
    assert_eq!(paper.performance, "BLEU improves.");
    assert_eq!(paper.conclusion, "Attention wins.");
    assert_eq!(paper.figures.len(), 1);
    assert_eq!(paper.figures[0].figure_id, "S3.F1");
}

#[test]
fn test_paper_context_accepts_flat_top_level_sections() {
    let flat = json!({"abstract": "No wrapper object.", "conclusion": "Done."});
    let paper = PaperContext::from_value(&flat);
    assert_eq!(paper.title, "Research Paper");
    assert_eq!(paper.abstract_text, "No wrapper object.");
    assert_eq!(paper.conclusion, "Done.");
}

#[test]
fn test_truncate_chars_respects_boundaries() {
    assert_eq!(paper::truncate_chars("hello", 3), "hel");
    assert_eq!(paper::truncate_chars("hello", 10), "hello");
    assert_eq!(paper::truncate_chars("한국어 텍스트", 3), "한국어");
}

#[test]
fn test_figure_substitution_rewrites_known_ids() {
    let figure_map = paper::figure_url_map(&sample_paper());
    let mut slides = vec![validate(
        SlideType::SingleContentWithImage,
        &json!({
            "title": "Architecture",
            "description": "As shown in Figure S3.F1, attention layers stack.",
            "image_url": "S3.F1",
            "image_alt": "Model architecture",
        }),
    )
    .unwrap()];

    paper::substitute_figure_refs(&mut slides, &figure_map);

    assert_eq!(slides[0]["image_url"], json!("https://example.com/fig1.png"));
    assert_eq!(
        slides[0]["description"],
        json!("As shown in (see figure), attention layers stack.")
    );
}

#[test]
fn test_figure_substitution_clears_unknown_ids() {
    let figure_map = paper::figure_url_map(&sample_paper());
    let mut slides = vec![validate(
        SlideType::ImageWithDescription2,
        &json!({
            "title": "Figures",
            "images": [
                {"url": "S3.F1", "alt_text": "Known"},
                {"url": "S9.F9", "alt_text": "Unknown"},
            ],
            "items": [
                {"title": "A", "description": "First"},
                {"title": "B", "description": "Second"},
            ],
        }),
    )
    .unwrap()];

    paper::substitute_figure_refs(&mut slides, &figure_map);

    let images = slides[0]["images"].as_array().unwrap();
    assert_eq!(images[0]["url"], json!("https://example.com/fig1.png"));
    assert_eq!(images[1]["url"], json!(""));
}

#[test]
fn test_figure_substitution_leaves_plain_urls_alone() {
    let figure_map = paper::figure_url_map(&sample_paper());
    let mut slides = vec![validate(
        SlideType::SingleContentWithImage,
        &json!({
            "title": "External",
            "description": "Nothing to rewrite here.",
            "image_url": "https://example.com/other.png",
            "image_alt": "Other",
        }),
    )
    .unwrap()];

    paper::substitute_figure_refs(&mut slides, &figure_map);
    assert_eq!(slides[0]["image_url"], json!("https://example.com/other.png"));
}

// ---------------------------------------------------------------------------
// Plan parsing
// ---------------------------------------------------------------------------

fn plan_json(slide_count: usize) -> String {
    let slides: Vec<Value> = (0..slide_count)
        .map(|i| {
            json!({
                "slide_number": i + 1,
                "type": "section_title",
                "purpose": format!("Purpose {}", i + 1),
                "key_points": format!("Points {}", i + 1),
            })
        })
        .collect();
    json!({"title": "Sample Plan", "total_slides": slide_count, "slides": slides}).to_string()
}

#[test]
fn test_parse_plan_accepts_valid_output() {
    let plan = plan::parse_plan(&plan_json(5), 10).unwrap();
    assert_eq!(plan.title, "Sample Plan");
    assert_eq!(plan.slides.len(), 5);
    assert_eq!(plan.slides[0].slide_type, SlideType::SectionTitle);
}

#[test]
fn test_parse_plan_rejects_non_json() {
    let err = plan::parse_plan("not json at all", 10).unwrap_err();
    assert!(matches!(err, DeckError::PlanParseError(_)));
}

#[test]
fn test_parse_plan_rejects_unknown_tag() {
    let raw = json!({
        "title": "Plan",
        "total_slides": 1,
        "slides": [{
            "slide_number": 1,
            "type": "word_cloud",
            "purpose": "p",
            "key_points": "k",
        }],
    })
    .to_string();
    let err = plan::parse_plan(&raw, 10).unwrap_err();
    match err {
        DeckError::PlanSchemaError(message) => assert!(message.contains("word_cloud")),
        other => panic!("Expected PlanSchemaError, got {:?}", other),
    }
}

#[test]
fn test_parse_plan_rejects_missing_fields() {
    let raw = json!({
        "title": "Plan",
        "total_slides": 1,
        "slides": [{"slide_number": 1, "type": "quote"}],
    })
    .to_string();
    let err = plan::parse_plan(&raw, 10).unwrap_err();
    assert!(matches!(err, DeckError::PlanSchemaError(_)));
}

#[test]
fn test_parse_plan_enforces_requested_maximum() {
    let err = plan::parse_plan(&plan_json(6), 5).unwrap_err();
    assert!(matches!(err, DeckError::PlanSchemaError(_)));
}

#[test]
fn test_parse_plan_enforces_outline_lengths() {
    let raw = json!({
        "title": "Plan",
        "total_slides": 1,
        "slides": [{
            "slide_number": 1,
            "type": "quote",
            "purpose": "p".repeat(201),
            "key_points": "k",
        }],
    })
    .to_string();
    let err = plan::parse_plan(&raw, 10).unwrap_err();
    assert!(matches!(err, DeckError::PlanSchemaError(_)));
}
