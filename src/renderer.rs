// ABOUTME: Template renderer for the deck-slides application
// ABOUTME: Renders validated slide content through per-type templates into Marp markdown

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use minijinja::{path_loader, Environment};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{DeckError, Result};
use crate::types::SlideType;
use crate::utils;
use crate::validator;

/// Fixed Marp front-matter prepended to assembled presentations.
pub const FRONTMATTER: &str = "---\nmarp: true\ntheme: custom-style\n---\n\n";

/// Separator between adjacent slide fragments. Exactly one between every
/// pair, none before the first or after the last.
pub const SLIDE_SEPARATOR: &str = "\n---\n\n";

/// One entry of the batch rendering input: a slide type tag plus its
/// content mapping. The tag stays a string here so unknown types surface
/// with positional context at render time rather than at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideRecord {
    #[serde(rename = "type")]
    pub slide_type: String,
    pub content: Value,
}

/// Renders slides from externally supplied templates, one per slide type.
///
/// Templates are looked up as `<tag>.md.jinja` in the template directory.
/// The renderer owns no template syntax of its own; the validated content
/// mapping's fields are handed to the template as named variables.
#[derive(Debug)]
pub struct SlideRenderer {
    env: Environment<'static>,
}

impl SlideRenderer {
    pub fn new(template_dir: &Path) -> Result<Self> {
        if !template_dir.is_dir() {
            return Err(DeckError::TemplateDirNotFound(template_dir.to_path_buf()));
        }

        let mut env = Environment::new();
        env.set_loader(path_loader(template_dir));
        env.set_keep_trailing_newline(true);

        Ok(Self { env })
    }

    /// Render a single slide.
    ///
    /// With `validate` set, content is checked against the slide type's
    /// schema first and the normalized mapping is rendered; validation
    /// errors propagate. With `validate` unset the content is rendered
    /// as given, which is only appropriate for already-validated content.
    pub fn render(&self, slide_type: SlideType, content: &Value, validate: bool) -> Result<String> {
        let context = if validate {
            Value::Object(validator::validate(slide_type, content)?)
        } else {
            content.clone()
        };

        let name = format!("{}.md.jinja", slide_type.as_tag());
        let template = self.env.get_template(&name).map_err(|err| {
            if err.kind() == minijinja::ErrorKind::TemplateNotFound {
                DeckError::TemplateNotFound(slide_type.as_tag().to_string())
            } else {
                DeckError::TemplateRender {
                    slide_type: slide_type.as_tag().to_string(),
                    message: err.to_string(),
                }
            }
        })?;

        template
            .render(minijinja::Value::from_serialize(&context))
            .map_err(|err| DeckError::TemplateRender {
                slide_type: slide_type.as_tag().to_string(),
                message: err.to_string(),
            })
    }

    /// Render a batch of slides into one presentation document.
    ///
    /// All-or-nothing: any single failure aborts the batch with an error
    /// carrying the 0-based index and tag of the failing entry, so bad data
    /// can be located in a large batch.
    pub fn render_presentation(
        &self,
        slides: &[SlideRecord],
        validate: bool,
        include_frontmatter: bool,
    ) -> Result<String> {
        let mut fragments = Vec::with_capacity(slides.len());

        for (index, record) in slides.iter().enumerate() {
            let fragment = SlideType::parse_tag(&record.slide_type)
                .and_then(|slide_type| self.render(slide_type, &record.content, validate))
                .map_err(|err| DeckError::SlideRenderFailed {
                    index,
                    slide_type: record.slide_type.clone(),
                    source: Box::new(err),
                })?;
            fragments.push(fragment);
        }

        let body = fragments.join(SLIDE_SEPARATOR);
        if include_frontmatter {
            Ok(format!("{}{}", FRONTMATTER, body))
        } else {
            Ok(body)
        }
    }

    /// Render a presentation from a JSON file containing an array of
    /// `{"type": ..., "content": {...}}` records.
    pub fn render_from_file(&self, json_path: &Path, validate: bool) -> Result<String> {
        utils::validate_file_exists(json_path)?;
        let raw = fs::read_to_string(json_path).map_err(DeckError::FileReadError)?;
        let slides: Vec<SlideRecord> = serde_json::from_str(&raw)?;
        self.render_presentation(&slides, validate, true)
    }

    /// Render a batch and write the presentation to `output_path`.
    pub fn save_presentation(
        &self,
        slides: &[SlideRecord],
        output_path: &Path,
        validate: bool,
    ) -> Result<PathBuf> {
        let markdown = self.render_presentation(slides, validate, true)?;
        utils::ensure_parent_directory_exists(output_path)?;
        fs::write(output_path, &markdown).map_err(DeckError::FileReadError)?;
        info!("Presentation saved to {:?}", output_path);
        Ok(output_path.to_path_buf())
    }
}
