//! Blog post listing

use folio_theme::Typography;

use crate::components::bio::render_bio_text;
use crate::components::cube::{render_cube, CubeState};
use crate::components::layout::{Layout, BLOG_ROOT};
use crate::config::{PostConfig, SiteConfig};
use crate::markup::{anchor, div, heading, Element};

/// The blog index page
pub struct BlogIndex<'a> {
    pub config: &'a SiteConfig,
    /// Year shown in the footer
    pub year: i32,
}

impl BlogIndex<'_> {
    pub fn render(&self) -> Element {
        let typography = self.config.theme.typography();

        let mut content = vec![render_bio_text(&self.config.site.twitter)
            .style("margin-bottom", typography.rhythm(2.5).to_string())];
        content.extend(
            self.config
                .posts
                .iter()
                .map(|post| render_post_summary(post, &typography)),
        );

        Layout {
            title: &self.config.site.title,
            author: &self.config.site.author,
            year: self.year,
        }
        .render(&typography, render_cube(CubeState::default()), content)
    }

    pub fn render_html(&self) -> String {
        self.render().to_html()
    }
}

fn render_post_summary(post: &PostConfig, typography: &Typography) -> Element {
    let title = if post.title.trim().is_empty() {
        post.slug.as_str()
    } else {
        post.title.as_str()
    };

    let mut summary = div().class("Post-summary").child(
        heading(3)
            .style("margin-bottom", typography.rhythm(0.25).to_string())
            .child(
                anchor(format!("{}/{}", BLOG_ROOT, post.slug))
                    .style("box-shadow", "none")
                    .text(title),
            ),
    );
    if let Some(date) = &post.date {
        summary = summary.child(Element::new("small").text(date.as_str()));
    }
    if let Some(description) = &post.description {
        summary = summary.child(Element::new("p").text(description.as_str()));
    }
    summary
}
