// ABOUTME: Paper input adapter for the deck-slides application
// ABOUTME: Flattens inconsistently nested paper JSON into section texts and a figure catalog

use std::collections::HashMap;

use log::warn;
use serde_json::{Map, Value};

/// A figure referenced by the source paper.
#[derive(Debug, Clone)]
pub struct FigureRef {
    pub figure_id: String,
    pub url: String,
    pub caption: String,
}

/// Flattened view of a paper: per-section text plus the figure catalog.
///
/// Paper JSON arrives in one of two shapes: `{title, sections: {...}}` or a
/// flat section map at the top level. Section values are either plain
/// strings or lists of subsection objects carrying `paragraphs` and
/// `figures`. This adapter normalizes both shapes, best-effort; malformed
/// pieces flatten to empty text rather than failing the pipeline.
#[derive(Debug, Clone)]
pub struct PaperContext {
    pub title: String,
    pub abstract_text: String,
    pub method: String,
    pub performance: String,
    pub conclusion: String,
    pub figures: Vec<FigureRef>,
}

impl PaperContext {
    pub fn from_value(paper: &Value) -> Self {
        let (title, sections) = split_title_and_sections(paper);
        Self {
            title,
            abstract_text: section_text(sections.get("abstract")),
            method: section_text(sections.get("method")),
            performance: section_text(sections.get("performance")),
            conclusion: section_text(sections.get("conclusion")),
            figures: collect_figures(&sections),
        }
    }
}

fn split_title_and_sections(paper: &Value) -> (String, Map<String, Value>) {
    let object = paper.as_object().cloned().unwrap_or_default();
    if let Some(sections) = object.get("sections").and_then(Value::as_object) {
        let title = object
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Research Paper")
            .to_string();
        (title, sections.clone())
    } else {
        ("Research Paper".to_string(), object)
    }
}

/// Flatten a section value to plain text. Strings pass through; subsection
/// lists contribute their `paragraphs` entries joined with spaces.
fn section_text(section: Option<&Value>) -> String {
    match section {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(subsections)) => {
            let mut paragraphs = Vec::new();
            for subsection in subsections {
                if let Some(entries) = subsection.get("paragraphs").and_then(Value::as_array) {
                    paragraphs.extend(entries.iter().filter_map(Value::as_str));
                }
            }
            paragraphs.join(" ")
        }
        _ => String::new(),
    }
}

/// Truncate to a hard character cap, respecting char boundaries.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

fn figures_in_subsection(subsection: &Value, figures: &mut Vec<FigureRef>) {
    let Some(entries) = subsection.get("figures").and_then(Value::as_array) else {
        return;
    };
    for entry in entries {
        let (Some(figure_id), Some(url)) = (
            entry.get("figure_id").and_then(Value::as_str),
            entry.get("absolute_url").and_then(Value::as_str),
        ) else {
            continue;
        };
        figures.push(FigureRef {
            figure_id: figure_id.to_string(),
            url: url.to_string(),
            caption: entry
                .get("caption")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
    }
}

fn collect_figures(sections: &Map<String, Value>) -> Vec<FigureRef> {
    let mut figures = Vec::new();
    for section in sections.values() {
        match section {
            Value::Array(subsections) => {
                for subsection in subsections {
                    figures_in_subsection(subsection, &mut figures);
                }
            }
            Value::Object(_) => figures_in_subsection(section, &mut figures),
            _ => {}
        }
    }
    figures
}

/// Build the figure-id to URL lookup used by the substitution pass.
pub fn figure_url_map(paper: &Value) -> HashMap<String, String> {
    let (_, sections) = split_title_and_sections(paper);
    collect_figures(&sections)
        .into_iter()
        .map(|figure| (figure.figure_id, figure.url))
        .collect()
}

/// Figure catalog block for generation instruction contexts. Limited to the
/// first five figures, addressed by figure id rather than raw URL.
pub fn figures_prompt_block(figures: &[FigureRef]) -> String {
    if figures.is_empty() {
        return String::new();
    }
    let mut block = String::from("\n\n**Available Figures** (Select by Figure ID):\n");
    for (index, figure) in figures.iter().take(5).enumerate() {
        block.push_str(&format!(
            "{}. Figure ID: {}\n   Caption: {}\n\n",
            index + 1,
            figure.figure_id,
            figure.caption
        ));
    }
    block.push_str(
        "\n**IMPORTANT**: For image URLs, use the Figure ID (e.g., 'S3.F1'), NOT the actual \
         URL. The system will convert it to the real URL automatically.",
    );
    block
}

/// Heuristic for unresolved figure references left in image URL fields.
fn looks_like_figure_id(value: &str) -> bool {
    value.starts_with('S') && value.contains('.')
}

fn substitute_url_field(field: &mut Value, figure_map: &HashMap<String, String>) {
    let Some(current) = field.as_str() else { return };
    if let Some(url) = figure_map.get(current) {
        *field = Value::String(url.clone());
    } else if looks_like_figure_id(current) {
        warn!("Invalid Figure ID '{}' not found in paper", current);
        *field = Value::String(String::new());
    }
}

fn substitute_text_field(field: &mut Value, figure_map: &HashMap<String, String>) {
    let Some(current) = field.as_str() else { return };
    let mut text = current.to_string();
    for figure_id in figure_map.keys() {
        if text.contains(figure_id.as_str()) {
            text = text.replace(&format!("Figure {}", figure_id), "(see figure)");
            text = text.replace(figure_id.as_str(), "(see figure)");
        }
    }
    if text != current {
        *field = Value::String(text);
    }
}

/// Rewrite figure-id references inside generated slide content, in place.
///
/// Image URL fields holding a known figure id become the real URL; URL
/// fields holding an id-shaped string with no match are cleared with a
/// warning. Figure-id mentions inside text fields become "(see figure)".
pub fn substitute_figure_refs(
    slides: &mut [Map<String, Value>],
    figure_map: &HashMap<String, String>,
) {
    const TEXT_FIELDS: [&str; 4] = ["description", "title", "content", "subtitle"];

    for slide in slides.iter_mut() {
        if let Some(field) = slide.get_mut("image_url") {
            substitute_url_field(field, figure_map);
        }

        if let Some(images) = slide.get_mut("images").and_then(Value::as_array_mut) {
            for image in images {
                match image {
                    Value::Object(entry) => {
                        if let Some(url) = entry.get_mut("url") {
                            substitute_url_field(url, figure_map);
                        }
                    }
                    // Tolerate bare string entries from unvalidated content.
                    Value::String(_) => substitute_url_field(image, figure_map),
                    _ => {}
                }
            }
        }

        for name in TEXT_FIELDS {
            if let Some(field) = slide.get_mut(name) {
                substitute_text_field(field, figure_map);
            }
        }

        if let Some(items) = slide.get_mut("items").and_then(Value::as_array_mut) {
            for item in items {
                let Some(entry) = item.as_object_mut() else { continue };
                for name in ["title", "description"] {
                    if let Some(field) = entry.get_mut(name) {
                        substitute_text_field(field, figure_map);
                    }
                }
            }
        }
    }
}
