// ABOUTME: End-to-end paper conversion for the deck-slides application
// ABOUTME: Chains planning, parallel generation, figure substitution, and rendering

use std::sync::Arc;

use log::info;
use serde_json::Value;

use crate::errors::Result;
use crate::generate::generate_all_slides;
use crate::llm::ChatCompleter;
use crate::paper::{self, PaperContext};
use crate::plan::plan_presentation;
use crate::renderer::{SlideRecord, SlideRenderer};

/// Options for a full paper-to-presentation run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub max_slides: usize,
    pub language: String,
    pub max_retries: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_slides: 10,
            language: "ko".to_string(),
            max_retries: crate::generate::DEFAULT_MAX_RETRIES,
        }
    }
}

/// Convert paper JSON into a rendered Marp presentation.
///
/// Planning completes before any generation task starts; generation runs
/// one task per outline entry; the figure substitution pass rewrites
/// figure-id references before the final validated render.
pub async fn convert_paper<C>(
    completer: &Arc<C>,
    renderer: &SlideRenderer,
    paper_json: &Value,
    options: &ConvertOptions,
) -> Result<String>
where
    C: ChatCompleter + Send + Sync + 'static,
{
    let figure_map = paper::figure_url_map(paper_json);
    info!("Built figure map: {} figures", figure_map.len());

    let paper = Arc::new(PaperContext::from_value(paper_json));

    let plan =
        plan_presentation(completer.as_ref(), &paper, options.max_slides, &options.language)
            .await?;

    let generated =
        generate_all_slides(completer, &plan, &paper, &options.language, options.max_retries)
            .await;

    let mut contents: Vec<_> = generated.iter().map(|slide| slide.content.clone()).collect();
    paper::substitute_figure_refs(&mut contents, &figure_map);

    let records: Vec<SlideRecord> = generated
        .iter()
        .zip(contents)
        .map(|(slide, content)| SlideRecord {
            slide_type: slide.slide_type.as_tag().to_string(),
            content: Value::Object(content),
        })
        .collect();

    info!("Rendering {} slides", records.len());
    renderer.render_presentation(&records, true, true)
}
