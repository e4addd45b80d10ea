//! Site colors and global style overrides

use serde::{Deserialize, Serialize};

use crate::typography::{Typography, TypographyConfig};

/// Colors used across the site
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub text: String,
    pub link: String,
    pub page_background: String,
    /// Start color of the pointer-driven gradient
    pub gradient_from: String,
    /// End color of the pointer-driven gradient
    pub gradient_to: String,
    pub muted: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: "hsla(0, 0%, 0%, 0.9)".to_string(),
            link: "#ff4f4b".to_string(),
            page_background: "#fff662".to_string(),
            gradient_from: "#fff662".to_string(),
            gradient_to: "#ff4f4b".to_string(),
            muted: "hsla(0, 0%, 0%, 0.59)".to_string(),
        }
    }
}

/// Complete theme: palette plus typography
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub palette: Palette,
    pub typography: TypographyConfig,
}

impl Theme {
    pub fn typography(&self) -> Typography {
        Typography::new(self.typography.clone())
    }

    /// CSS for the page gradient at `angle_deg`
    pub fn gradient_css(&self, angle_deg: f32) -> String {
        format!(
            "linear-gradient({:.2}deg, {}, {})",
            angle_deg, self.palette.gradient_from, self.palette.gradient_to
        )
    }

    /// Document styles: typography base plus color overrides
    pub fn global_css(&self) -> String {
        let mut css = self.typography().to_css();
        css.push_str(&format!("body {{ color: {}; }}\n", self.palette.text));
        css.push_str(&format!(
            "a {{ color: {}; box-shadow: none; text-decoration: none; }}\n",
            self.palette.link
        ));
        css.push_str(&format!("small, time {{ color: {}; }}\n", self.palette.muted));
        css.push_str(".App-email-left-transition, .App-email-right-transition { transition: transform 0.4s ease; }\n");
        css.push_str(".App-email-left-transition { transform: translateX(-0.25em); }\n");
        css.push_str(".App-email-right-transition { transform: translateX(0.25em); }\n");
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let theme = Theme::default();
        assert_eq!(theme.palette.link, "#ff4f4b");
        assert_eq!(theme.palette.page_background, "#fff662");
    }

    #[test]
    fn test_gradient_css() {
        let theme = Theme::default();
        assert_eq!(
            theme.gradient_css(92.5),
            "linear-gradient(92.50deg, #fff662, #ff4f4b)"
        );
    }

    #[test]
    fn test_global_css_overrides_links() {
        let css = Theme::default().global_css();
        assert!(css.contains("a { color: #ff4f4b;"));
        assert!(css.contains("html { font-size: 21px;"));
    }

    #[test]
    fn test_partial_override_from_toml() {
        let theme: Theme = toml::from_str(
            r##"
            [palette]
            link = "#0000ff"

            [typography]
            base_font_size = 18.0
            "##,
        )
        .unwrap();

        assert_eq!(theme.palette.link, "#0000ff");
        assert_eq!(theme.palette.page_background, "#fff662");
        assert_eq!(theme.typography.base_font_size, 18.0);
        assert_eq!(theme.typography.base_line_height, 1.75);
    }
}
