// ABOUTME: Slide content generation (Phase 2) for the deck-slides application
// ABOUTME: Per-slide generation with validation retry, fanned out over a task group

use std::sync::Arc;

use log::{error, info, warn};
use serde_json::{Map, Value};
use tokio::task::JoinSet;

use crate::errors::{DeckError, Result};
use crate::llm::{ChatCompleter, ChatMessage, CompletionRequest};
use crate::paper::{figures_prompt_block, truncate_chars, PaperContext};
use crate::plan::{language_name, PresentationPlan, SlideOutline};
use crate::schema::json_schema;
use crate::types::SlideType;
use crate::validator;

/// Sampling temperature for slide content. Kept near-deterministic so
/// retries converge instead of wandering.
pub const SLIDE_TEMPERATURE: f32 = 0.05;

/// Default retry budget: up to 3 total attempts per slide.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// A successfully generated slide: its layout plus validated content.
#[derive(Debug, Clone)]
pub struct GeneratedSlide {
    pub slide_type: SlideType,
    pub content: Map<String, Value>,
}

fn build_slide_prompt(outline: &SlideOutline, paper: &PaperContext, language: &str) -> String {
    let schema = json_schema(outline.slide_type);
    format!(
        r#"Generate slide content following the plan.

**Slide Plan**:
- Number: {number}
- Type: {slide_type}
- Purpose: {purpose}
- Key Points: {key_points}

**Paper Context**:
- Title: {title}
- Abstract: {abstract_text}
- Method: {method}
- Performance: {performance}
- Conclusion: {conclusion}{figures}

**Instructions**:
- Generate content in {lang_name}
- Follow the exact schema for {slide_type}
- Include the specific key points mentioned in the plan
- Keep within ALL character limits declared in the schema
- For image URLs, use Figure IDs from the "Available Figures" list, match
  figures to slide content by caption, and use caption text to write image
  descriptions. Never invent URLs or Figure IDs.
- Output valid JSON matching the schema

**Schema**: {schema}

Generate the slide as JSON now.
"#,
        number = outline.slide_number,
        slide_type = outline.slide_type,
        purpose = outline.purpose,
        key_points = outline.key_points,
        title = paper.title,
        abstract_text = truncate_chars(&paper.abstract_text, 500),
        method = truncate_chars(&paper.method, 400),
        performance = truncate_chars(&paper.performance, 400),
        conclusion = truncate_chars(&paper.conclusion, 300),
        figures = figures_prompt_block(&paper.figures),
        lang_name = language_name(language),
        schema = schema,
    )
}

fn build_retry_prompt(base_prompt: &str, feedback: &str) -> String {
    format!(
        r#"{base_prompt}

**VALIDATION FEEDBACK FROM PREVIOUS ATTEMPT**:
The previous generation failed validation with the following error:
{feedback}

Fix the above validation errors. Pay special attention to:
- Character limits (must be STRICTLY followed)
- List length constraints (min/max items)
- Required fields (all must be present)
- Field types (strings and lists of objects)

Regenerate the slide with ALL validation errors fixed.
"#
    )
}

async fn attempt_slide<C: ChatCompleter>(
    completer: &C,
    slide_type: SlideType,
    system: &str,
    user_prompt: String,
) -> Result<Map<String, Value>> {
    let messages = vec![ChatMessage::system(system), ChatMessage::user(user_prompt)];
    let raw = completer
        .complete_json(CompletionRequest { messages, temperature: SLIDE_TEMPERATURE })
        .await?;
    let value: Value = serde_json::from_str(&raw)?;
    validator::validate(slide_type, &value)
}

/// Phase 2: generate content for one outlined slide.
///
/// Attempts are strictly sequential, at most `max_retries + 1` of them. On
/// each failure the error detail is fed back verbatim into the next
/// attempt's instruction context so the collaborator can self-correct; the
/// core performs no field-level repair of its own. Exhaustion yields `None`
/// rather than an error, so one bad slide cannot abort its siblings.
pub async fn generate_slide<C: ChatCompleter>(
    completer: &C,
    outline: &SlideOutline,
    paper: &PaperContext,
    language: &str,
    max_retries: u32,
) -> Option<Map<String, Value>> {
    let base_prompt = build_slide_prompt(outline, paper, language);
    let system = format!(
        "Generate a {} slide in {}. Output valid JSON only. Respect ALL character limits. \
         For images, use Figure IDs from the Available Figures list - never invent IDs.",
        outline.slide_type,
        language_name(language)
    );

    let mut feedback: Option<String> = None;

    for attempt in 0..=max_retries {
        let user_prompt = match &feedback {
            Some(detail) => build_retry_prompt(&base_prompt, detail),
            None => base_prompt.clone(),
        };

        match attempt_slide(completer, outline.slide_type, &system, user_prompt).await {
            Ok(content) => {
                if attempt > 0 {
                    info!(
                        "Slide {} [{}] generated (retry {})",
                        outline.slide_number, outline.slide_type, attempt
                    );
                } else {
                    info!("Slide {} [{}] generated", outline.slide_number, outline.slide_type);
                }
                return Some(content);
            }
            Err(err) => {
                if attempt < max_retries {
                    warn!(
                        "Slide {} [{}] failed attempt {}/{}, retrying: {}",
                        outline.slide_number,
                        outline.slide_type,
                        attempt + 1,
                        max_retries + 1,
                        err
                    );
                }
                feedback = Some(err.to_string());
            }
        }
    }

    let exhausted = DeckError::SlideGenerationExhausted {
        slide_number: outline.slide_number,
        slide_type: outline.slide_type,
        attempts: max_retries + 1,
        detail: feedback.unwrap_or_default(),
    };
    error!("{}", exhausted);
    None
}

/// Phase 2 orchestrator: generate every planned slide concurrently.
///
/// One task per outline entry, no shared mutable state between tasks. All
/// tasks are awaited; tasks that fault are dropped exactly like tasks that
/// exhausted their retries, with a logged reason. Survivors keep the
/// relative order of their outline positions.
pub async fn generate_all_slides<C>(
    completer: &Arc<C>,
    plan: &PresentationPlan,
    paper: &Arc<PaperContext>,
    language: &str,
    max_retries: u32,
) -> Vec<GeneratedSlide>
where
    C: ChatCompleter + Send + Sync + 'static,
{
    let total = plan.slides.len();
    info!("Generating {} slides in parallel", total);

    let mut tasks = JoinSet::new();
    for (index, outline) in plan.slides.iter().cloned().enumerate() {
        let completer = Arc::clone(completer);
        let paper = Arc::clone(paper);
        let language = language.to_string();
        tasks.spawn(async move {
            let content =
                generate_slide(completer.as_ref(), &outline, &paper, &language, max_retries).await;
            (index, outline.slide_type, content)
        });
    }

    let mut slots: Vec<Option<GeneratedSlide>> = (0..total).map(|_| None).collect();
    while let Some(outcome) = tasks.join_next().await {
        match outcome {
            Ok((index, slide_type, Some(content))) => {
                slots[index] = Some(GeneratedSlide { slide_type, content });
            }
            Ok((index, slide_type, None)) => {
                warn!(
                    "Dropping slide at position {} [{}]: generation exhausted",
                    index + 1,
                    slide_type
                );
            }
            Err(err) => {
                warn!("Dropping slide: generation task failed: {}", err);
            }
        }
    }

    let slides: Vec<GeneratedSlide> = slots.into_iter().flatten().collect();
    info!("Generated {}/{} slides successfully", slides.len(), total);
    slides
}
