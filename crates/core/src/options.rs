//! Configuration for the page-number shape and the staging area.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Appearance and placement of the inserted page-number shape.
///
/// Coordinates are EMUs. The defaults put a bold 12pt black number in the
/// bottom-right corner of a 4:3 slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    /// Numeric prefix of the shape id; the slide index is appended to it.
    pub id_prefix: u32,
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
    /// Font size in hundredths of a point.
    pub font_size: u32,
    pub bold: bool,
    /// RGB hex, without `#`.
    pub color: String,
    pub typeface: String,
    pub lang: String,
    /// Paragraph alignment (`l`, `ctr`, `r`, ...).
    pub alignment: String,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            id_prefix: 100,
            x: 8_128_000,
            y: 6_096_000,
            cx: 914_400,
            cy: 365_760,
            font_size: 1200,
            bold: true,
            color: "000000".to_string(),
            typeface: "Arial".to_string(),
            lang: "en-US".to_string(),
            alignment: "r".to_string(),
        }
    }
}

impl ShapeStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_prefix(mut self, prefix: u32) -> Self {
        self.id_prefix = prefix;
        self
    }

    pub fn with_offset(mut self, x: i64, y: i64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_extent(mut self, cx: i64, cy: i64) -> Self {
        self.cx = cx;
        self.cy = cy;
        self
    }

    pub fn with_font_size(mut self, hundredths_pt: u32) -> Self {
        self.font_size = hundredths_pt;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_color(mut self, rgb: impl Into<String>) -> Self {
        self.color = rgb.into().trim_start_matches('#').to_string();
        self
    }

    pub fn with_typeface(mut self, typeface: impl Into<String>) -> Self {
        self.typeface = typeface.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = alignment.into();
        self
    }

    /// The shape id for a slide, e.g. prefix 100 and index 1 give `1001`.
    pub fn shape_id(&self, slide_index: usize) -> String {
        format!("{}{}", self.id_prefix, slide_index)
    }
}

/// Where intermediate copies of the package live during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagingMode {
    /// A fresh, uniquely named temporary directory, removed when the run ends.
    Disk {
        /// Parent directory; the system temp dir when `None`.
        root: Option<PathBuf>,
    },
    /// Keep everything in memory. Needed where there is no filesystem.
    Memory,
}

impl Default for StagingMode {
    fn default() -> Self {
        Self::Disk { root: None }
    }
}

/// Options for a numbering run.
#[derive(Debug, Clone, Default)]
pub struct NumberingOptions {
    pub style: ShapeStyle,
    pub staging: StagingMode,
}

impl NumberingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_staging(mut self, staging: StagingMode) -> Self {
        self.staging = staging;
        self
    }
}
