// ABOUTME: Slide type catalog for the deck-slides application
// ABOUTME: Defines the 14 fixed slide layouts and their descriptive metadata

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DeckError, Result};

/// The closed set of slide layouts a presentation can use.
///
/// Serialized as snake_case tags (e.g. `title_slide`, `metrics_grid`), which
/// are the lookup keys for schemas and templates everywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    TitleSlide,
    SectionTitle,
    SingleContentWithImage,
    Highlight,
    TwoColumnList,
    VerticalList,
    #[serde(rename = "horizontal_3_column_list")]
    Horizontal3ColumnList,
    TwoColumnsWithGrid,
    #[serde(rename = "horizontal_4_column_list")]
    Horizontal4ColumnList,
    #[serde(rename = "image_with_description_2")]
    ImageWithDescription2,
    #[serde(rename = "image_with_description_3")]
    ImageWithDescription3,
    ThreeColumnMetrics,
    MetricsGrid,
    Quote,
}

/// Broad grouping of slide types by their primary function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Basic,
    Layout,
    Content,
    Metrics,
    Special,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Basic => "basic",
            Category::Layout => "layout",
            Category::Content => "content",
            Category::Metrics => "metrics",
            Category::Special => "special",
        }
    }
}

/// Descriptive metadata attached to a slide type.
///
/// Kept in a lookup table separate from the enum so descriptive text can
/// change without touching the tag set itself.
pub struct SlideTypeInfo {
    /// Plain-language description suitable for generation instructions.
    pub description: &'static str,
    /// When this layout is the right choice.
    pub use_case: &'static str,
}

impl SlideType {
    /// All 14 slide types in catalog order.
    pub const ALL: [SlideType; 14] = [
        SlideType::TitleSlide,
        SlideType::SectionTitle,
        SlideType::SingleContentWithImage,
        SlideType::Highlight,
        SlideType::TwoColumnList,
        SlideType::VerticalList,
        SlideType::Horizontal3ColumnList,
        SlideType::TwoColumnsWithGrid,
        SlideType::Horizontal4ColumnList,
        SlideType::ImageWithDescription2,
        SlideType::ImageWithDescription3,
        SlideType::ThreeColumnMetrics,
        SlideType::MetricsGrid,
        SlideType::Quote,
    ];

    /// The snake_case tag used for template and schema lookup.
    pub fn as_tag(self) -> &'static str {
        match self {
            SlideType::TitleSlide => "title_slide",
            SlideType::SectionTitle => "section_title",
            SlideType::SingleContentWithImage => "single_content_with_image",
            SlideType::Highlight => "highlight",
            SlideType::TwoColumnList => "two_column_list",
            SlideType::VerticalList => "vertical_list",
            SlideType::Horizontal3ColumnList => "horizontal_3_column_list",
            SlideType::TwoColumnsWithGrid => "two_columns_with_grid",
            SlideType::Horizontal4ColumnList => "horizontal_4_column_list",
            SlideType::ImageWithDescription2 => "image_with_description_2",
            SlideType::ImageWithDescription3 => "image_with_description_3",
            SlideType::ThreeColumnMetrics => "three_column_metrics",
            SlideType::MetricsGrid => "metrics_grid",
            SlideType::Quote => "quote",
        }
    }

    /// Parse a tag string into a slide type.
    pub fn parse_tag(tag: &str) -> Result<SlideType> {
        SlideType::ALL
            .iter()
            .find(|t| t.as_tag() == tag)
            .copied()
            .ok_or_else(|| DeckError::UnknownSlideType(tag.to_string()))
    }

    pub fn category(self) -> Category {
        match self {
            SlideType::TitleSlide | SlideType::SectionTitle => Category::Basic,
            SlideType::SingleContentWithImage
            | SlideType::Highlight
            | SlideType::TwoColumnList
            | SlideType::TwoColumnsWithGrid => Category::Layout,
            SlideType::VerticalList
            | SlideType::Horizontal3ColumnList
            | SlideType::Horizontal4ColumnList
            | SlideType::ImageWithDescription2
            | SlideType::ImageWithDescription3 => Category::Content,
            SlideType::ThreeColumnMetrics | SlideType::MetricsGrid => Category::Metrics,
            SlideType::Quote => Category::Special,
        }
    }

    /// Descriptive metadata for this slide type.
    pub fn info(self) -> &'static SlideTypeInfo {
        match self {
            SlideType::TitleSlide => &SlideTypeInfo {
                description: "Opening slide with a main title and subtitle",
                use_case: "Presentation opening, cover slide, title page, introduction",
            },
            SlideType::SectionTitle => &SlideTypeInfo {
                description: "Centered title slide for dividing presentation sections",
                use_case: "Section breaks, chapter transitions, topic changes, agenda items",
            },
            SlideType::SingleContentWithImage => &SlideTypeInfo {
                description: "Text content on the left with a large image on the right",
                use_case: "Feature spotlight, product showcase, concept explanation with visual",
            },
            SlideType::Highlight => &SlideTypeInfo {
                description: "Emphasized message or call-to-action with title on left",
                use_case: "Key messages, important callouts, memorable quotes, CTAs",
            },
            SlideType::TwoColumnList => &SlideTypeInfo {
                description: "Title on left with 2-4 list items stacked vertically on right",
                use_case: "Bullet points, feature lists, step-by-step instructions, benefits",
            },
            SlideType::VerticalList => &SlideTypeInfo {
                description: "Full-width title with 3-6 items stacked vertically below",
                use_case: "Detailed feature lists, step-by-step processes, agenda items",
            },
            SlideType::Horizontal3ColumnList => &SlideTypeInfo {
                description: "Title with exactly 3 items arranged horizontally side-by-side",
                use_case: "Three-way comparisons, feature trios, pricing tiers, three options",
            },
            SlideType::TwoColumnsWithGrid => &SlideTypeInfo {
                description: "Title on left with exactly 4 items arranged in a 2x2 grid on right",
                use_case: "Four-quadrant analysis, 2x2 matrices, SWOT analysis, four key points",
            },
            SlideType::Horizontal4ColumnList => &SlideTypeInfo {
                description: "Title with exactly 4 items arranged horizontally side-by-side",
                use_case: "Four-step processes, quarterly results, four phases, four categories",
            },
            SlideType::ImageWithDescription2 => &SlideTypeInfo {
                description: "Two images displayed side-by-side with a description below each",
                use_case: "Before/after comparisons, dual products, two options, A/B comparison",
            },
            SlideType::ImageWithDescription3 => &SlideTypeInfo {
                description: "Three images displayed side-by-side with a description below each",
                use_case: "Product galleries, step-by-step visuals, three examples",
            },
            SlideType::ThreeColumnMetrics => &SlideTypeInfo {
                description: "Display three key metrics side-by-side with values and labels",
                use_case: "KPI dashboard, performance metrics, statistics overview, key numbers",
            },
            SlideType::MetricsGrid => &SlideTypeInfo {
                description: "Title and description on left with exactly 4 metrics in a 2x2 grid",
                use_case: "Dashboard views, quarterly metrics, four KPIs, performance summary",
            },
            SlideType::Quote => &SlideTypeInfo {
                description: "Centered quote with author attribution",
                use_case: "Testimonials, customer quotes, impactful statements, endorsements",
            },
        }
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Numbered catalog of all slide types with descriptions and use cases,
/// formatted for inclusion in a generation instruction context.
pub fn selection_catalog() -> String {
    let mut lines = vec!["Available slide types:".to_string(), String::new()];
    for (idx, slide_type) in SlideType::ALL.iter().enumerate() {
        let info = slide_type.info();
        lines.push(format!("{}. {}", idx + 1, slide_type.as_tag()));
        lines.push(format!("   Description: {}", info.description));
        lines.push(format!("   Use case: {}", info.use_case));
        lines.push(format!("   Category: {}", slide_type.category().as_str()));
        lines.push(String::new());
    }
    lines.join("\n")
}
