// ABOUTME: Content schema registry for the deck-slides application
// ABOUTME: Encodes field presence, length, and cardinality rules for each slide type

use serde_json::{json, Value};

use crate::types::SlideType;

/// Shape of a nested list element.
///
/// The item kinds are shared across several top-level schemas; their field
/// length bounds hold regardless of which parent schema references them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// `{title, description}` list entry.
    ListItem,
    /// `{url, alt_text}` image reference.
    ImageItem,
    /// `{value, label}` metric for 2x2 metric grids.
    MetricValue,
    /// `{value, description}` metric for 3-column metric rows.
    MetricWithDescription,
}

/// Field of a nested list element, with its character limit.
pub struct ItemFieldSpec {
    pub name: &'static str,
    pub max_len: usize,
}

impl ItemKind {
    /// Ordered fields of this item shape. All are required.
    pub fn fields(self) -> &'static [ItemFieldSpec] {
        match self {
            ItemKind::ListItem => &[
                ItemFieldSpec { name: "title", max_len: 100 },
                ItemFieldSpec { name: "description", max_len: 300 },
            ],
            ItemKind::ImageItem => &[
                ItemFieldSpec { name: "url", max_len: 500 },
                ItemFieldSpec { name: "alt_text", max_len: 200 },
            ],
            ItemKind::MetricValue => &[
                ItemFieldSpec { name: "value", max_len: 20 },
                ItemFieldSpec { name: "label", max_len: 50 },
            ],
            ItemKind::MetricWithDescription => &[
                ItemFieldSpec { name: "value", max_len: 20 },
                ItemFieldSpec { name: "description", max_len: 150 },
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemKind::ListItem => "list item",
            ItemKind::ImageItem => "image item",
            ItemKind::MetricValue => "metric value",
            ItemKind::MetricWithDescription => "metric with description",
        }
    }
}

/// Kind of a top-level content field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Plain text with a character limit (counted in characters, not bytes).
    Text { max_len: usize },
    /// List of nested items with inclusive cardinality bounds.
    List {
        item: ItemKind,
        min_items: usize,
        max_items: usize,
    },
}

/// One required field of a content schema.
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// The full content contract for one slide type: an ordered set of required
/// fields. Registry data is static; there is no mutation API.
pub struct ContentSchema {
    pub fields: &'static [FieldSpec],
}

// Cardinality bounds mirror fixed visual grid layouts in the rendering
// target: the exact-count schemas (3-column, 2x2, image pairs/trios) must
// stay exact.
static TITLE_SLIDE: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 80 } },
        FieldSpec { name: "subtitle", kind: FieldKind::Text { max_len: 120 } },
    ],
};

static SECTION_TITLE: ContentSchema = ContentSchema {
    fields: &[FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } }],
};

static SINGLE_CONTENT_WITH_IMAGE: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } },
        FieldSpec { name: "description", kind: FieldKind::Text { max_len: 300 } },
        FieldSpec { name: "image_url", kind: FieldKind::Text { max_len: 500 } },
        FieldSpec { name: "image_alt", kind: FieldKind::Text { max_len: 200 } },
    ],
};

static HIGHLIGHT: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 40 } },
        FieldSpec { name: "content", kind: FieldKind::Text { max_len: 200 } },
    ],
};

static TWO_COLUMN_LIST: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } },
        FieldSpec {
            name: "items",
            kind: FieldKind::List { item: ItemKind::ListItem, min_items: 2, max_items: 4 },
        },
    ],
};

static VERTICAL_LIST: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } },
        FieldSpec {
            name: "items",
            kind: FieldKind::List { item: ItemKind::ListItem, min_items: 3, max_items: 6 },
        },
    ],
};

static HORIZONTAL_3_COLUMN_LIST: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } },
        FieldSpec {
            name: "items",
            kind: FieldKind::List { item: ItemKind::ListItem, min_items: 3, max_items: 3 },
        },
    ],
};

static TWO_COLUMNS_WITH_GRID: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } },
        FieldSpec {
            name: "items",
            kind: FieldKind::List { item: ItemKind::ListItem, min_items: 4, max_items: 4 },
        },
    ],
};

static HORIZONTAL_4_COLUMN_LIST: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } },
        FieldSpec {
            name: "items",
            kind: FieldKind::List { item: ItemKind::ListItem, min_items: 4, max_items: 4 },
        },
    ],
};

static IMAGE_WITH_DESCRIPTION_2: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } },
        FieldSpec {
            name: "images",
            kind: FieldKind::List { item: ItemKind::ImageItem, min_items: 2, max_items: 2 },
        },
        FieldSpec {
            name: "items",
            kind: FieldKind::List { item: ItemKind::ListItem, min_items: 2, max_items: 2 },
        },
    ],
};

static IMAGE_WITH_DESCRIPTION_3: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } },
        FieldSpec {
            name: "images",
            kind: FieldKind::List { item: ItemKind::ImageItem, min_items: 3, max_items: 3 },
        },
        FieldSpec {
            name: "items",
            kind: FieldKind::List { item: ItemKind::ListItem, min_items: 3, max_items: 3 },
        },
    ],
};

static THREE_COLUMN_METRICS: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 60 } },
        FieldSpec {
            name: "metrics",
            kind: FieldKind::List {
                item: ItemKind::MetricWithDescription,
                min_items: 3,
                max_items: 3,
            },
        },
    ],
};

static METRICS_GRID: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::Text { max_len: 40 } },
        FieldSpec { name: "description", kind: FieldKind::Text { max_len: 200 } },
        FieldSpec {
            name: "metrics",
            kind: FieldKind::List { item: ItemKind::MetricValue, min_items: 4, max_items: 4 },
        },
    ],
};

static QUOTE: ContentSchema = ContentSchema {
    fields: &[
        FieldSpec { name: "quote", kind: FieldKind::Text { max_len: 200 } },
        FieldSpec { name: "author", kind: FieldKind::Text { max_len: 80 } },
    ],
};

/// Look up the content schema for a slide type. Total over the enum; tag
/// strings that are not one of the 14 types fail earlier, at parse time.
pub fn schema_for(slide_type: SlideType) -> &'static ContentSchema {
    match slide_type {
        SlideType::TitleSlide => &TITLE_SLIDE,
        SlideType::SectionTitle => &SECTION_TITLE,
        SlideType::SingleContentWithImage => &SINGLE_CONTENT_WITH_IMAGE,
        SlideType::Highlight => &HIGHLIGHT,
        SlideType::TwoColumnList => &TWO_COLUMN_LIST,
        SlideType::VerticalList => &VERTICAL_LIST,
        SlideType::Horizontal3ColumnList => &HORIZONTAL_3_COLUMN_LIST,
        SlideType::TwoColumnsWithGrid => &TWO_COLUMNS_WITH_GRID,
        SlideType::Horizontal4ColumnList => &HORIZONTAL_4_COLUMN_LIST,
        SlideType::ImageWithDescription2 => &IMAGE_WITH_DESCRIPTION_2,
        SlideType::ImageWithDescription3 => &IMAGE_WITH_DESCRIPTION_3,
        SlideType::ThreeColumnMetrics => &THREE_COLUMN_METRICS,
        SlideType::MetricsGrid => &METRICS_GRID,
        SlideType::Quote => &QUOTE,
    }
}

/// Build a JSON Schema document for one slide type's content, suitable for
/// embedding in a structured-output instruction context.
pub fn json_schema(slide_type: SlideType) -> Value {
    let schema = schema_for(slide_type);
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for field in schema.fields {
        required.push(Value::String(field.name.to_string()));
        let prop = match field.kind {
            FieldKind::Text { max_len } => json!({
                "type": "string",
                "maxLength": max_len,
            }),
            FieldKind::List { item, min_items, max_items } => {
                let mut item_props = serde_json::Map::new();
                let mut item_required = Vec::new();
                for item_field in item.fields() {
                    item_required.push(Value::String(item_field.name.to_string()));
                    item_props.insert(
                        item_field.name.to_string(),
                        json!({"type": "string", "maxLength": item_field.max_len}),
                    );
                }
                json!({
                    "type": "array",
                    "minItems": min_items,
                    "maxItems": max_items,
                    "items": {
                        "type": "object",
                        "properties": item_props,
                        "required": item_required,
                    },
                })
            }
        };
        properties.insert(field.name.to_string(), prop);
    }

    json!({
        "title": slide_type.as_tag(),
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// JSON Schemas for all 14 slide types, keyed by tag.
pub fn schema_catalog() -> Value {
    let mut catalog = serde_json::Map::new();
    for slide_type in SlideType::ALL {
        catalog.insert(slide_type.as_tag().to_string(), json_schema(slide_type));
    }
    Value::Object(catalog)
}

/// One-line human-readable summary of a schema's requirements, used when
/// enumerating the catalog for planning instructions.
pub fn requirement_summary(slide_type: SlideType) -> String {
    let schema = schema_for(slide_type);
    let parts: Vec<String> = schema
        .fields
        .iter()
        .map(|field| match field.kind {
            FieldKind::Text { max_len } => format!("{} (max {} chars)", field.name, max_len),
            FieldKind::List { item, min_items, max_items } => {
                if min_items == max_items {
                    format!("{}: exactly {} {}s", field.name, min_items, item.name())
                } else {
                    format!("{}: {}-{} {}s", field.name, min_items, max_items, item.name())
                }
            }
        })
        .collect();
    parts.join(", ")
}
