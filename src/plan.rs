// ABOUTME: Presentation planning (Phase 1) for the deck-slides application
// ABOUTME: Builds the planning instruction context and validates the returned plan

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{DeckError, Result};
use crate::llm::{ChatCompleter, ChatMessage, CompletionRequest};
use crate::paper::{figures_prompt_block, truncate_chars, PaperContext};
use crate::schema::requirement_summary;
use crate::types::{selection_catalog, SlideType};

/// Sampling temperature for planning. Warmer than slide generation so the
/// outline varies in structure run to run.
pub const PLAN_TEMPERATURE: f32 = 0.5;

const MAX_PLAN_TITLE_CHARS: usize = 100;
const MAX_PURPOSE_CHARS: usize = 200;
const MAX_KEY_POINTS_CHARS: usize = 500;

/// Outline for a single slide: the layout to use and what it should say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideOutline {
    pub slide_number: u32,
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    pub purpose: String,
    pub key_points: String,
}

/// Complete presentation plan, the Phase 1 output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationPlan {
    pub title: String,
    pub total_slides: u32,
    pub slides: Vec<SlideOutline>,
}

// Raw mirror of the plan shape with the tag left as a string, so unknown
// tags surface as schema errors instead of parse errors.
#[derive(Deserialize)]
struct RawPlan {
    title: String,
    total_slides: u32,
    slides: Vec<RawOutline>,
}

#[derive(Deserialize)]
struct RawOutline {
    slide_number: u32,
    #[serde(rename = "type")]
    slide_type: String,
    purpose: String,
    key_points: String,
}

/// Human-readable language names for instruction contexts.
pub fn language_name(code: &str) -> &str {
    match code {
        "ko" => "한국어",
        "en" => "English",
        "ja" => "日本語",
        "zh" => "中文",
        "es" => "Español",
        "fr" => "Français",
        "de" => "Deutsch",
        other => other,
    }
}

fn requirements_block() -> String {
    SlideType::ALL
        .iter()
        .map(|slide_type| format!("- {}: {}", slide_type.as_tag(), requirement_summary(*slide_type)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_plan_prompt(paper: &PaperContext, max_slides: usize, language: &str) -> String {
    let lang_name = language_name(language);
    format!(
        r#"You are a presentation planning expert. Analyze this paper and create a presentation plan.

**Paper Information**:
- Title: {title}
- Abstract: {abstract_text}
- Method: {method}
- Performance: {performance}
- Conclusion: {conclusion}{figures}

**Your Task**:
Create a presentation plan with {max_slides} slides maximum in {lang_name}.

{catalog}
**Content Requirements per Type**:
{requirements}

**Planning Guidelines**:
- Start with title_slide (paper title and authors)
- Use section_title for major sections (Abstract, Method, Results, Conclusion)
- Use highlight for key contributions (keep content under 200 chars)
- Use metrics_grid or three_column_metrics for performance results
- End with quote for takeaway message
- Distribute content evenly across slides
- **Image Selection**: when planning image slides, use Figure IDs from the
  "Available Figures" list, match figures to slide content by caption, and
  never invent Figure IDs. If no suitable figures exist, use text-only
  slide types instead. Name the chosen Figure IDs in key_points.

**Character Limits**:
- purpose field: MAX 200 characters
- key_points field: MAX 500 characters
- title: MAX 100 characters

**Output Format** (JSON):
{{
  "title": "Presentation title in {lang_name}",
  "total_slides": {max_slides},
  "slides": [
    {{
      "slide_number": 1,
      "type": "title_slide",
      "purpose": "Introduce paper and authors",
      "key_points": "Paper title, authors, publication year"
    }}
  ]
}}

Every slide MUST have all 4 fields: slide_number, type, purpose, key_points.
Generate the plan as JSON now. Ensure all content fits character limits.
"#,
        title = paper.title,
        abstract_text = truncate_chars(&paper.abstract_text, 800),
        method = truncate_chars(&paper.method, 500),
        performance = truncate_chars(&paper.performance, 500),
        conclusion = truncate_chars(&paper.conclusion, 400),
        figures = figures_prompt_block(&paper.figures),
        max_slides = max_slides,
        lang_name = lang_name,
        catalog = selection_catalog(),
        requirements = requirements_block(),
    )
}

fn check_length(field: &str, value: &str, limit: usize) -> Result<()> {
    let length = value.chars().count();
    if length > limit {
        return Err(DeckError::PlanSchemaError(format!(
            "field '{}' is {} characters long (limit {})",
            field, length, limit
        )));
    }
    Ok(())
}

/// Parse and validate a collaborator's plan output.
///
/// Output that is not JSON fails with `PlanParseError`; JSON that does not
/// satisfy the plan shape (missing fields, unknown tags, more than
/// `max_slides` entries, overlong text) fails with `PlanSchemaError`.
/// There is no fallback to an empty plan.
pub fn parse_plan(raw: &str, max_slides: usize) -> Result<PresentationPlan> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|err| DeckError::PlanParseError(err.to_string()))?;
    let raw_plan: RawPlan = serde_json::from_value(value)
        .map_err(|err| DeckError::PlanSchemaError(err.to_string()))?;

    check_length("title", &raw_plan.title, MAX_PLAN_TITLE_CHARS)?;
    if raw_plan.slides.len() > max_slides {
        return Err(DeckError::PlanSchemaError(format!(
            "plan contains {} slides (requested at most {})",
            raw_plan.slides.len(),
            max_slides
        )));
    }

    let mut slides = Vec::with_capacity(raw_plan.slides.len());
    for outline in raw_plan.slides {
        let slide_type = SlideType::parse_tag(&outline.slide_type).map_err(|_| {
            DeckError::PlanSchemaError(format!(
                "slide {}: unknown slide type '{}'",
                outline.slide_number, outline.slide_type
            ))
        })?;
        let field = format!("slide {} purpose", outline.slide_number);
        check_length(&field, &outline.purpose, MAX_PURPOSE_CHARS)?;
        let field = format!("slide {} key_points", outline.slide_number);
        check_length(&field, &outline.key_points, MAX_KEY_POINTS_CHARS)?;

        slides.push(SlideOutline {
            slide_number: outline.slide_number,
            slide_type,
            purpose: outline.purpose,
            key_points: outline.key_points,
        });
    }

    Ok(PresentationPlan {
        title: raw_plan.title,
        total_slides: raw_plan.total_slides,
        slides,
    })
}

/// Phase 1: plan the presentation structure from the paper context.
///
/// Strictly sequential and blocking; Phase 2 depends on the full outline.
pub async fn plan_presentation<C: ChatCompleter>(
    completer: &C,
    paper: &PaperContext,
    max_slides: usize,
    language: &str,
) -> Result<PresentationPlan> {
    info!(
        "Planning presentation: max {} slides, language {}",
        max_slides,
        language_name(language)
    );

    let messages = vec![
        ChatMessage::system("You are a presentation planning expert. Output valid JSON only."),
        ChatMessage::user(build_plan_prompt(paper, max_slides, language)),
    ];

    let raw = completer
        .complete_json(CompletionRequest { messages, temperature: PLAN_TEMPERATURE })
        .await?;
    let plan = parse_plan(&raw, max_slides)?;

    info!(
        "Planning complete: '{}' with {} slides",
        plan.title,
        plan.slides.len()
    );
    for outline in &plan.slides {
        debug!(
            "  {}. [{}] {}",
            outline.slide_number, outline.slide_type, outline.purpose
        );
    }

    Ok(plan)
}
