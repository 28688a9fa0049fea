//! Layout document model
//!
//! Layouts are YAML mappings with an ordered `items` list. This module turns
//! that text into a validated [`Document`] and writes it back out with a
//! stable key order.

pub mod error;
pub mod placement;

pub use error::{DocumentError, ValidationError};
pub use placement::{Placement, Resolution, ResolutionError, MAX_COORDINATE};

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::SerializationError;
use crate::layout::{compute_bounds, Size};

/// A validated layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Destination path, if the layout names one
    pub output: Option<String>,
    /// Explicit canvas size, if the layout gives one
    pub canvas: Option<Size>,
    /// Placements in draw order, never empty
    pub placements: Vec<Placement>,
}

impl Document {
    /// Parse and validate layout text
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_yaml::from_str(text).map_err(SerializationError::from)?;
        Ok(Self::from_value(&value)?)
    }

    /// Validate an already deserialized layout value
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let Value::Mapping(root) = value else {
            return Err(ValidationError::NotAMapping {
                found: value_kind(value),
            });
        };

        let output = match present(root, "output") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(ValidationError::invalid_value(
                    "output",
                    format!("expected a string, found {}", value_kind(other)),
                ))
            }
        };

        let canvas = parse_canvas(root)?;

        let items = match present(root, "items") {
            None => return Err(ValidationError::MissingItems),
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                return Err(ValidationError::invalid_value(
                    "items",
                    format!("expected a list, found {}", value_kind(other)),
                ))
            }
        };
        if items.is_empty() {
            return Err(ValidationError::EmptyItems);
        }

        let placements = items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_item(i + 1, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            output,
            canvas,
            placements,
        })
    }

    /// Serialize with keys in `output`, `canvas_width`, `canvas_height`, `items` order
    pub fn to_text(&self) -> Result<String, SerializationError> {
        let text = LayoutText {
            output: self.output.as_deref(),
            canvas_width: self.canvas.map(|c| c.width),
            canvas_height: self.canvas.map(|c| c.height),
            items: self
                .placements
                .iter()
                .map(|p| ItemText {
                    file: &p.file,
                    x: p.x,
                    y: p.y,
                    resolution: p.resolution.to_string(),
                })
                .collect(),
        };
        serde_yaml::to_string(&text).map_err(|e| SerializationError::Emit {
            message: e.to_string(),
        })
    }

    /// Canvas size: the explicit one, or the extent of all placements
    pub fn canvas_size(&self) -> Size {
        self.canvas
            .unwrap_or_else(|| compute_bounds(&self.placements))
    }

    /// Output path, falling back to `default` when the layout names none
    pub fn output_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.output.as_deref().unwrap_or(default)
    }
}

#[derive(Serialize)]
struct LayoutText<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    canvas_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    canvas_height: Option<u32>,
    items: Vec<ItemText<'a>>,
}

#[derive(Serialize)]
struct ItemText<'a> {
    file: &'a str,
    x: i64,
    y: i64,
    resolution: String,
}

/// Look up a key, treating an explicit null like an absent key
fn present<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn parse_canvas(root: &Mapping) -> Result<Option<Size>, ValidationError> {
    let width = present(root, "canvas_width");
    let height = present(root, "canvas_height");
    match (width, height) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(ValidationError::PartialCanvas {
            present: "canvas_width",
        }),
        (None, Some(_)) => Err(ValidationError::PartialCanvas {
            present: "canvas_height",
        }),
        (Some(w), Some(h)) => Ok(Some(Size::new(
            canvas_dimension("canvas_width", w)?,
            canvas_dimension("canvas_height", h)?,
        ))),
    }
}

fn canvas_dimension(field: &'static str, value: &Value) -> Result<u32, ValidationError> {
    let n = coerce_int(value).map_err(|reason| ValidationError::invalid_value(field, reason))?;
    if n <= 0 {
        return Err(ValidationError::invalid_value(
            field,
            format!("must be positive, found {}", n),
        ));
    }
    u32::try_from(n).map_err(|_| ValidationError::invalid_value(field, format!("{} is too large", n)))
}

fn parse_item(index: usize, item: &Value) -> Result<Placement, ValidationError> {
    let Value::Mapping(map) = item else {
        return Err(ValidationError::ItemNotAMapping {
            index,
            found: value_kind(item),
        });
    };
    let require = |field: &'static str| {
        map.get(field)
            .ok_or(ValidationError::MissingField { index, field })
    };

    let file = match require("file")? {
        Value::String(s) if s.trim().is_empty() => {
            return Err(ValidationError::invalid_field(index, "file", "must not be empty"))
        }
        Value::String(s) => s.clone(),
        other => {
            return Err(ValidationError::invalid_field(
                index,
                "file",
                format!("expected a string, found {}", value_kind(other)),
            ))
        }
    };

    let coordinate = |field: &'static str| {
        coerce_int(require(field)?)
            .and_then(check_coordinate)
            .map_err(|r| ValidationError::invalid_field(index, field, r))
    };
    let x = coordinate("x")?;
    let y = coordinate("y")?;

    let resolution = match require("resolution")? {
        Value::String(s) => s
            .parse::<Resolution>()
            .map_err(|e| ValidationError::invalid_field(index, "resolution", e.to_string()))?,
        other => {
            return Err(ValidationError::invalid_field(
                index,
                "resolution",
                format!("expected a \"WxH\" string, found {}", value_kind(other)),
            ))
        }
    };

    Ok(Placement {
        file,
        x,
        y,
        resolution,
    })
}

fn check_coordinate(value: i64) -> Result<i64, String> {
    if (-MAX_COORDINATE..=MAX_COORDINATE).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is further than {} from the origin", value, MAX_COORDINATE))
    }
}

/// Accept integers, floats (truncated toward zero) and integer strings
fn coerce_int(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(format!("{} is too large", n))
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                    _ => Err(format!("{} is not a usable integer", n)),
                }
            }
        }
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("expected an integer, found \"{}\"", s)),
        other => Err(format!("expected an integer, found {}", value_kind(other))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_ITEMS: &str = r#"
output: out.png
items:
  - file: "img1.png"
    x: 0
    y: 0
    resolution: "32x32"
  - file: "img2.png"
    x: 32
    y: 0
    resolution: "64X64"
"#;

    fn validation(text: &str) -> ValidationError {
        match Document::parse(text) {
            Err(DocumentError::Validation(e)) => e,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_two_items() {
        let doc = Document::parse(TWO_ITEMS).unwrap();
        assert_eq!(doc.output.as_deref(), Some("out.png"));
        assert_eq!(doc.canvas, None);
        assert_eq!(
            doc.placements,
            vec![
                Placement::new("img1.png", 0, 0, Resolution::new(32, 32)),
                Placement::new("img2.png", 32, 0, Resolution::new(64, 64)),
            ]
        );
    }

    #[test]
    fn test_canvas_fallback() {
        let doc = Document::parse(TWO_ITEMS).unwrap();
        assert_eq!(doc.canvas_size(), Size::new(96, 64));
    }

    #[test]
    fn test_explicit_canvas() {
        let doc = Document::parse(
            "canvas_width: 200\ncanvas_height: \"150\"\nitems:\n  - {file: a.png, x: 0, y: 0, resolution: 8x8}\n",
        )
        .unwrap();
        assert_eq!(doc.canvas_size(), Size::new(200, 150));
    }

    #[test]
    fn test_coerces_integer_like_positions() {
        let doc = Document::parse(
            "items:\n  - {file: a.png, x: \"12\", y: 7.9, resolution: 8x8}\n  - {file: b.png, x: -3.5, y: \" -4 \", resolution: 8x8}\n",
        )
        .unwrap();
        assert_eq!((doc.placements[0].x, doc.placements[0].y), (12, 7));
        assert_eq!((doc.placements[1].x, doc.placements[1].y), (-3, -4));
    }

    #[test]
    fn test_missing_items() {
        assert_eq!(validation("output: out.png"), ValidationError::MissingItems);
        assert_eq!(validation("items: []"), ValidationError::EmptyItems);
        assert_eq!(validation("items:"), ValidationError::MissingItems);
    }

    #[test]
    fn test_not_a_mapping() {
        assert_eq!(
            validation("- a\n- b\n"),
            ValidationError::NotAMapping { found: "a list" }
        );
        assert_eq!(
            validation(""),
            ValidationError::NotAMapping { found: "nothing" }
        );
    }

    #[test]
    fn test_item_errors_carry_index_and_field() {
        let err = validation(
            "items:\n  - {file: a.png, x: 0, y: 0, resolution: 8x8}\n  - {file: b.png, x: 0, y: 0}\n",
        );
        assert_eq!(
            err,
            ValidationError::MissingField {
                index: 2,
                field: "resolution"
            }
        );

        let err = validation("items:\n  - {file: a.png, x: [1], y: 0, resolution: 8x8}\n");
        assert_eq!(err.index(), Some(1));
        assert_eq!(err.field(), Some("x"));

        let err = validation("items:\n  - {file: a.png, x: 0, y: 0, resolution: 0x8}\n");
        assert_eq!(err.field(), Some("resolution"));

        let err = validation("items:\n  - {file: 5, x: 0, y: 0, resolution: 8x8}\n");
        assert_eq!(err.field(), Some("file"));

        let err = validation("items:\n  - just-a-string\n");
        assert_eq!(
            err,
            ValidationError::ItemNotAMapping {
                index: 1,
                found: "a string"
            }
        );
    }

    #[test]
    fn test_extreme_coordinates_rejected() {
        let err = validation("items:\n  - {file: a.png, x: 9223372036854775807, y: 0, resolution: 8x8}\n");
        assert_eq!((err.index(), err.field()), (Some(1), Some("x")));

        let err = validation("items:\n  - {file: a.png, x: 0, y: -9223372036854775808, resolution: 8x8}\n");
        assert_eq!((err.index(), err.field()), (Some(1), Some("y")));

        let edge = format!(
            "items:\n  - {{file: a.png, x: {}, y: -{}, resolution: 8x8}}\n",
            MAX_COORDINATE, MAX_COORDINATE
        );
        let doc = Document::parse(&edge).unwrap();
        assert_eq!(doc.canvas_size(), Size::new(u32::MAX, 0));
    }

    #[test]
    fn test_canvas_must_be_complete_and_positive() {
        let item = "items:\n  - {file: a.png, x: 0, y: 0, resolution: 8x8}\n";
        assert_eq!(
            validation(&format!("canvas_width: 10\n{}", item)),
            ValidationError::PartialCanvas {
                present: "canvas_width"
            }
        );
        assert_eq!(
            validation(&format!("canvas_width: 10\ncanvas_height: 0\n{}", item)).field(),
            Some("canvas_height")
        );
    }

    #[test]
    fn test_output_must_be_string() {
        let err = validation("output: [a]\nitems:\n  - {file: a.png, x: 0, y: 0, resolution: 8x8}\n");
        assert_eq!(err.field(), Some("output"));
    }

    #[test]
    fn test_syntax_error_is_serialization() {
        let err = Document::parse("items:\n  - file: \"a.png\n").unwrap_err();
        assert!(matches!(err, DocumentError::Serialization(_)));
        assert!(err.line().is_some());
    }

    #[test]
    fn test_round_trip() {
        let doc = Document::parse(TWO_ITEMS).unwrap();
        let text = doc.to_text().unwrap();
        assert_eq!(Document::parse(&text).unwrap(), doc);
    }

    #[test]
    fn test_serialized_key_order() {
        let mut doc = Document::parse(TWO_ITEMS).unwrap();
        doc.canvas = Some(Size::new(96, 64));
        let text = doc.to_text().unwrap();

        let keys = ["output:", "canvas_width:", "canvas_height:", "items:"];
        let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);

        let item_keys = ["file:", "x:", "y:", "resolution:"];
        let positions: Vec<usize> = item_keys.iter().map(|k| text.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
    }

    #[test]
    fn test_serialize_omits_absent_keys() {
        let doc = Document {
            output: None,
            canvas: None,
            placements: vec![Placement::new("a.png", 1, 2, Resolution::new(3, 4))],
        };
        let text = doc.to_text().unwrap();
        assert!(!text.contains("output"));
        assert!(!text.contains("canvas_"));
        assert_eq!(doc.output_or("wallpaper.png"), "wallpaper.png");
    }
}
