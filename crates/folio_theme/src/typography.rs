//! Vertical rhythm and modular type scale
//!
//! Two pure functions drive every layout constant on the site:
//!
//! - [`Typography::rhythm`] turns a number of lines into a rem length
//! - [`Typography::scale`] turns a scale step into a font size and a line
//!   height that keeps text on the baseline grid
//!
//! ```rust
//! use folio_theme::Typography;
//!
//! let typography = Typography::default();
//! assert_eq!(typography.rhythm(1.0).to_string(), "1.75rem");
//! assert_eq!(typography.scale(0.0).font_size.to_string(), "1rem");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A length in root ems
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Rem(pub f32);

impl Rem {
    pub fn value(&self) -> f32 {
        self.0
    }
}

impl fmt::Display for Rem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Four decimals is well below a device pixel
        let rounded = (self.0 * 10_000.0).round() / 10_000.0;
        write!(f, "{}rem", rounded)
    }
}

/// Font size and line height for one step of the type scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontScale {
    pub font_size: Rem,
    pub line_height: Rem,
}

/// Base values of the typographic system
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyConfig {
    /// Root font size in pixels
    pub base_font_size: f32,
    /// Line height as a multiple of the root font size
    pub base_line_height: f32,
    /// Ratio between consecutive steps of the type scale
    pub scale_ratio: f32,
    /// Minimum space kept above and below scaled text, in pixels
    pub min_line_padding: f32,
    pub round_to_nearest_half_line: bool,
    pub header_font_family: Vec<String>,
    pub body_font_family: Vec<String>,
    pub header_weight: u16,
    pub body_weight: u16,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        let family = || vec!["Catamaran".to_string(), "Georgia".to_string(), "serif".to_string()];
        Self {
            base_font_size: 21.0,
            base_line_height: 1.75,
            scale_ratio: 2.5,
            min_line_padding: 2.0,
            round_to_nearest_half_line: true,
            header_font_family: family(),
            body_font_family: family(),
            header_weight: 900,
            body_weight: 400,
        }
    }
}

/// The typographic system
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Typography {
    config: TypographyConfig,
}

impl Typography {
    pub fn new(config: TypographyConfig) -> Self {
        if config.base_font_size <= 0.0 || config.base_line_height <= 0.0 {
            tracing::warn!(
                base_font_size = config.base_font_size,
                base_line_height = config.base_line_height,
                "non-positive typography base, scaled text falls back to one line"
            );
        }
        Self { config }
    }

    pub fn config(&self) -> &TypographyConfig {
        &self.config
    }

    /// Height of one line in pixels
    pub fn line_height_px(&self) -> f32 {
        self.config.base_font_size * self.config.base_line_height
    }

    /// Vertical spacing of `lines` lines
    pub fn rhythm(&self, lines: f32) -> Rem {
        Rem(lines * self.config.base_line_height)
    }

    /// Font size and line height `value` steps up (or down) the modular scale
    pub fn scale(&self, value: f32) -> FontScale {
        let base = self.config.base_font_size;
        let font_px = base * self.config.scale_ratio.powf(value);
        let lines = self.lines_for(font_px);

        FontScale {
            font_size: Rem(font_px / base),
            line_height: self.rhythm(lines),
        }
    }

    /// Number of baseline lines a font size occupies
    fn lines_for(&self, font_px: f32) -> f32 {
        let line_px = self.line_height_px();
        if line_px <= 0.0 || !font_px.is_finite() {
            return 1.0;
        }

        let (mut lines, increment) = if self.config.round_to_nearest_half_line {
            ((2.0 * font_px / line_px).ceil() / 2.0, 0.5)
        } else {
            ((font_px / line_px).ceil(), 1.0)
        };

        if lines * line_px - font_px < self.config.min_line_padding * 2.0 {
            lines += increment;
        }
        lines.max(increment)
    }

    /// `font-family` value for headers
    pub fn header_font_stack(&self) -> String {
        font_stack(&self.config.header_font_family)
    }

    /// `font-family` value for body text
    pub fn body_font_stack(&self) -> String {
        font_stack(&self.config.body_font_family)
    }

    /// Base document styles
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        css.push_str(&format!(
            "html {{ font-size: {}px; line-height: {}; }}\n",
            self.config.base_font_size, self.config.base_line_height
        ));
        css.push_str(&format!(
            "body {{ font-family: {}; font-weight: {}; }}\n",
            self.body_font_stack(),
            self.config.body_weight
        ));

        for (tag, step) in [("h1", 1.2), ("h2", 0.8), ("h3", 0.4)] {
            let scale = self.scale(step);
            css.push_str(&format!(
                "{} {{ font-family: {}; font-weight: {}; font-size: {}; line-height: {}; margin-bottom: {}; }}\n",
                tag,
                self.header_font_stack(),
                self.config.header_weight,
                scale.font_size,
                scale.line_height,
                self.rhythm(1.0)
            ));
        }
        css
    }
}

fn font_stack(families: &[String]) -> String {
    families
        .iter()
        .map(|family| {
            if family.contains(' ') {
                format!("'{}'", family)
            } else {
                family.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
