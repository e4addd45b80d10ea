//! The animated link list

use folio_animation::TrailItem;

use crate::config::{LinkConfig, SiteConfig};
use crate::markup::{anchor, div, Element};

/// One entry of the link list, in display order
#[derive(Clone, Debug, PartialEq)]
pub enum LinkEntry {
    Link(LinkConfig),
    Email,
}

/// Links from the config with the email entry at its configured position
pub fn link_entries(config: &SiteConfig) -> Vec<LinkEntry> {
    let mut entries: Vec<LinkEntry> = config.links.iter().cloned().map(LinkEntry::Link).collect();
    let position = config.email.position.min(entries.len());
    entries.insert(position, LinkEntry::Email);
    entries
}

pub fn render_link(link: &LinkConfig) -> Element {
    anchor(link.href.as_str())
        .class("App-link")
        .child(div().text(link.label.as_str()))
}

/// Wrap each entry in the animated container of its trail item
///
/// Entries without a matching trail item render at rest.
pub fn render_trail(entries: Vec<Element>, items: &[TrailItem]) -> Element {
    let wrapped = entries.into_iter().enumerate().map(|(index, entry)| {
        let item = items.get(index).copied().unwrap_or(TrailItem::REST);
        div()
            .style("opacity", item.opacity.to_string())
            .style("transform", item.offset.translate3d())
            .child(entry)
    });

    div().class("App-links").children(wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::Offset;

    #[test]
    fn test_email_inserted_at_position() {
        let config = SiteConfig::default();
        let entries = link_entries(&config);

        assert_eq!(entries.len(), 5);
        assert_eq!(entries[3], LinkEntry::Email);
        assert!(matches!(&entries[4], LinkEntry::Link(link) if link.label == "RESUME"));
    }

    #[test]
    fn test_email_position_past_end_appends() {
        let mut config = SiteConfig::default();
        config.email.position = 42;
        assert_eq!(link_entries(&config).last(), Some(&LinkEntry::Email));
    }

    #[test]
    fn test_render_link() {
        let link = LinkConfig::new("BLOG", "/blog");
        assert_eq!(
            render_link(&link).to_html(),
            r#"<a class="App-link" href="/blog"><div>BLOG</div></a>"#
        );
    }

    #[test]
    fn test_trail_styles() {
        let items = [TrailItem {
            offset: Offset::new(-120.0, 200.0),
            opacity: 0.0,
        }];
        let tree = render_trail(vec![div().text("a"), div().text("b")], &items);

        let wrappers: Vec<_> = tree.child_elements().collect();
        assert_eq!(wrappers.len(), 2);
        assert_eq!(wrappers[0].get_style("opacity"), Some("0"));
        assert_eq!(
            wrappers[0].get_style("transform"),
            Some("translate3d(-120px, 200px, 0)")
        );
        assert_eq!(wrappers[1].get_style("opacity"), Some("1"));
    }
}
