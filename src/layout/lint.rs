//! Lint engine for detecting layout defects.
//!
//! Runs after validation to check for mechanical issues a render would
//! silently paper over: placements covering each other, placements that fall
//! partly outside the canvas, and the same image placed twice on the same
//! spot. Warnings never block rendering.

use std::fmt;

use tracing::warn;

use crate::document::{Document, Placement};

use super::types::{Rect, Size};

/// A lint warning about a layout defect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Overlap,
    Clipped,
    Duplicate,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Overlap => write!(f, "overlap"),
            LintCategory::Clipped => write!(f, "clipped"),
            LintCategory::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Run all lint checks on a validated document.
pub fn check(doc: &Document) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_overlaps(&doc.placements, &mut warnings);
    check_clipping(&doc.placements, doc.canvas_size(), &mut warnings);
    for w in &warnings {
        warn!(category = %w.category, "{}", w.message);
    }
    warnings
}

/// Display name for a placement: 1-based index and file
fn display_name(index: usize, placement: &Placement) -> String {
    format!("item {} (\"{}\")", index + 1, placement.file)
}

// ── Overlaps ──────────────────────────────────────────────────────

fn check_overlaps(placements: &[Placement], warnings: &mut Vec<LintWarning>) {
    for (i, a) in placements.iter().enumerate() {
        for (j, b) in placements.iter().enumerate().skip(i + 1) {
            if a.rect() == b.rect() && a.file == b.file {
                warnings.push(LintWarning {
                    category: LintCategory::Duplicate,
                    message: format!(
                        "{} repeats {} exactly",
                        display_name(j, b),
                        display_name(i, a)
                    ),
                });
                continue;
            }
            if let Some(shared) = a.rect().intersection(&b.rect()) {
                warnings.push(LintWarning {
                    category: LintCategory::Overlap,
                    message: format!(
                        "{} draws over {} ({}x{} px shared)",
                        display_name(j, b),
                        display_name(i, a),
                        shared.width,
                        shared.height
                    ),
                });
            }
        }
    }
}

// ── Clipping ──────────────────────────────────────────────────────

fn check_clipping(placements: &[Placement], canvas: Size, warnings: &mut Vec<LintWarning>) {
    let bounds = Rect::new(0, 0, canvas.width, canvas.height);
    for (i, p) in placements.iter().enumerate() {
        let rect = p.rect();
        if bounds.contains(&rect) {
            continue;
        }
        let visible = match bounds.intersection(&rect) {
            Some(v) => format!("only {}x{} px visible", v.width, v.height),
            None => "entirely off canvas".to_string(),
        };
        warnings.push(LintWarning {
            category: LintCategory::Clipped,
            message: format!(
                "{} at {} exceeds the {} canvas, {}",
                display_name(i, p),
                rect,
                canvas,
                visible
            ),
        });
    }
}
