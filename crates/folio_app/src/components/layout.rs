//! Page shells
//!
//! [`Layout`] frames blog pages: cube and title in the header, copyright in
//! the footer. [`IndexLayout`] frames the landing page and the blog root; on
//! the blog root its header is a large title instead of the cube.

use folio_theme::Typography;

use crate::markup::{anchor, div, footer, header, heading, main, Element};

/// Path of the blog root
pub const BLOG_ROOT: &str = "/blog";

fn container(typography: &Typography) -> Element {
    div()
        .style("margin-left", "auto")
        .style("margin-right", "auto")
        .style("max-width", typography.rhythm(24.0).to_string())
        .style(
            "padding",
            format!("{} {}", typography.rhythm(1.0), typography.rhythm(0.75)),
        )
}

fn header_bar() -> Element {
    header()
        .style("display", "flex")
        .style("align-items", "center")
        .style("height", "auto")
}

fn title_link(title: &str) -> Element {
    anchor(BLOG_ROOT)
        .style("box-shadow", "none")
        .style("text-decoration", "none")
        .style("color", "inherit")
        .text(title)
}

/// Cube linking to the blog, followed by a small title
fn cube_header(title: &str, cube: Element, font_stack: &str) -> Vec<Element> {
    vec![
        anchor(BLOG_ROOT)
            .style("box-shadow", "none")
            .style("margin-right", "20px")
            .style("height", "80px")
            .child(cube),
        heading(3)
            .style("font-family", font_stack)
            .style("margin-top", "33px")
            .child(title_link(title)),
    ]
}

/// Shell for blog pages
pub struct Layout<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub year: i32,
}

impl Layout<'_> {
    pub fn render(&self, typography: &Typography, cube: Element, content: Vec<Element>) -> Element {
        container(typography)
            .child(header_bar().children(cube_header(
                self.title,
                cube,
                "Montserrat, sans-serif",
            )))
            .child(main().children(content))
            .child(footer().text(format!("\u{A9} {} {}", self.year, self.author)))
    }
}

/// Shell for the landing page and the blog root
pub struct IndexLayout<'a> {
    pub title: &'a str,
    /// Path of the page being rendered
    pub location: &'a str,
}

impl IndexLayout<'_> {
    pub fn is_blog_root(&self) -> bool {
        self.location == BLOG_ROOT
    }

    pub fn render(&self, typography: &Typography, cube: Element, content: Vec<Element>) -> Element {
        let header_content = if self.is_blog_root() {
            let scale = typography.scale(1.2);
            vec![heading(1)
                .style("font-size", scale.font_size.to_string())
                .style("line-height", scale.line_height.to_string())
                .style("margin-bottom", typography.rhythm(1.5).to_string())
                .style("margin-top", "0")
                .child(title_link(self.title))]
        } else {
            cube_header(self.title, cube, "Montserrat, system-ui, sans-serif")
        };

        container(typography)
            .child(header_bar().children(header_content))
            .child(main().children(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Element {
        div().class("cube-container")
    }

    #[test]
    fn test_container_rhythm() {
        let typography = Typography::default();
        let tree = IndexLayout {
            title: "Site",
            location: "/",
        }
        .render(&typography, cube(), vec![]);

        assert_eq!(tree.get_style("max-width"), Some("42rem"));
        assert_eq!(tree.get_style("padding"), Some("1.75rem 1.3125rem"));
    }

    #[test]
    fn test_index_layout_shows_cube_off_root() {
        let tree = IndexLayout {
            title: "Site",
            location: "/",
        }
        .render(&Typography::default(), cube(), vec![]);

        assert!(tree.find_by_class("cube-container").is_some());
        assert!(tree.to_html().contains("<h3"));
    }

    #[test]
    fn test_index_layout_blog_root_uses_scaled_title() {
        let tree = IndexLayout {
            title: "Site",
            location: BLOG_ROOT,
        }
        .render(&Typography::default(), cube(), vec![]);

        let html = tree.to_html();
        assert!(tree.find_by_class("cube-container").is_none());
        assert!(html.contains("<h1 style=\"font-size: 3.0028rem; line-height: 3.5rem; margin-bottom: 2.625rem; margin-top: 0\">"));
    }

    #[test]
    fn test_layout_footer() {
        let tree = Layout {
            title: "Site",
            author: "Michal Czaplinski",
            year: 2019,
        }
        .render(&Typography::default(), cube(), vec![div().text("post")]);

        assert!(tree.text_content().ends_with("\u{A9} 2019 Michal Czaplinski"));
        assert!(tree.text_content().contains("post"));
    }
}
