//! Title block measurement and placement
//!
//! Text metrics are estimated from font size and line height; the renderer
//! owns the real glyph layout. Heights only drive vertical stacking, so the
//! estimate keeps relative positions stable across viewport sizes.

use crate::constants::*;
use crate::options::TextSpec;

use super::{Anchor, Element, Point, TextElement, TextRole};

/// Which title block to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBlockKind {
    /// Large title, wide date gap
    Regular,
    /// Smaller title, tight date gap
    Compact,
}

/// A measured title block ready to be anchored
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    title: String,
    title_lines: usize,
    title_size: f32,
    title_opacity: f32,
    date: Option<String>,
    date_size: f32,
    date_gap: f32,
    font: String,
    color: crate::types::Color,
}

impl TextBlock {
    /// Measure a title block at `px_per_mm`.
    ///
    /// Without any title text the placeholder title is shown faded.
    pub fn new(text: &TextSpec, kind: TextBlockKind, px_per_mm: f32) -> Self {
        let (title_mm, gap_mm) = match kind {
            TextBlockKind::Regular => (TITLE_FONT_MM, DATE_GAP_MM),
            TextBlockKind::Compact => (COMPACT_TITLE_FONT_MM, COMPACT_DATE_GAP_MM),
        };

        let (title, title_lines, title_opacity) = if text.has_title() {
            let lines = text.processed_lines();
            (lines.join("\n"), lines.len(), 1.0)
        } else {
            (
                PLACEHOLDER_TITLE.to_string(),
                PLACEHOLDER_TITLE_LINES,
                PLACEHOLDER_OPACITY,
            )
        };

        Self {
            title,
            title_lines,
            title_size: title_mm * px_per_mm * text.scale,
            title_opacity,
            date: (!text.date.is_empty()).then(|| text.date.clone()),
            date_size: DATE_FONT_MM * px_per_mm * text.scale,
            date_gap: gap_mm * px_per_mm,
            font: text.font.clone(),
            color: text.color,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.title_opacity < 1.0
    }

    pub fn title_height(&self) -> f32 {
        self.title_lines as f32 * self.title_size * TEXT_LINE_HEIGHT
    }

    /// Estimated height of title plus date
    pub fn height(&self) -> f32 {
        match self.date {
            Some(_) => self.title_height() + self.date_gap + self.date_size,
            None => self.title_height(),
        }
    }

    /// Place the block with its top edge at `top`, centred on `center_x`
    pub fn place_top(&self, center_x: f32, top: f32) -> Vec<Element> {
        let mut elements = vec![Element::Text(TextElement {
            role: TextRole::Title,
            text: self.title.clone(),
            font_family: self.font.clone(),
            font_size: self.title_size,
            line_height: TEXT_LINE_HEIGHT,
            letter_spacing: 0.0,
            color: self.color,
            opacity: self.title_opacity,
            anchor: Anchor::top(Point::new(center_x, top)),
            rotation_degrees: 0.0,
            shadow: false,
        })];

        if let Some(date) = &self.date {
            let date_top = top + self.title_height() + self.date_gap;
            elements.push(Element::Text(TextElement {
                role: TextRole::Date,
                text: date.clone(),
                font_family: self.font.clone(),
                font_size: self.date_size,
                line_height: 1.0,
                letter_spacing: 0.0,
                color: self.color,
                opacity: 1.0,
                anchor: Anchor::top(Point::new(center_x, date_top)),
                rotation_degrees: 0.0,
                shadow: false,
            }));
        }
        elements
    }

    /// Place the block vertically centred on `center`
    pub fn place_center(&self, center: Point) -> Vec<Element> {
        self.place_top(center.x, center.y - self.height() / 2.0)
    }
}

/// Magazine masthead: large shadowed title, top-anchored at `top`, with the
/// date below it. Nothing is placed without title text.
pub fn magazine_title(text: &TextSpec, px_per_mm: f32, center_x: f32, top: f32) -> Vec<Element> {
    let lines = text.processed_lines();
    if lines.is_empty() {
        return Vec::new();
    }

    let title_size = MAGAZINE_TITLE_FONT_MM * px_per_mm * text.scale;
    let title_height = lines.len() as f32 * title_size;

    let mut elements = vec![Element::Text(TextElement {
        role: TextRole::Title,
        text: lines.join("\n"),
        font_family: text.font.clone(),
        font_size: title_size,
        line_height: 1.0,
        letter_spacing: 0.0,
        color: text.color,
        opacity: 1.0,
        anchor: Anchor::top(Point::new(center_x, top)),
        rotation_degrees: 0.0,
        shadow: true,
    })];

    if !text.date.is_empty() {
        elements.push(Element::Text(TextElement {
            role: TextRole::Date,
            text: text.date.clone(),
            font_family: text.font.clone(),
            font_size: MAGAZINE_DATE_FONT_MM * px_per_mm,
            line_height: 1.0,
            letter_spacing: 0.0,
            color: text.color,
            opacity: 1.0,
            anchor: Anchor::top(Point::new(
                center_x,
                top + title_height + MAGAZINE_DATE_GAP_MM * px_per_mm,
            )),
            rotation_degrees: 0.0,
            shadow: false,
        }));
    }
    elements
}
