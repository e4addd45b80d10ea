//! Short author bio

use crate::markup::{anchor, div, span, Element};

const BIO_LINES: [(&str, &str, &str); 2] = [
    ("palm", "\u{1F334}", "I'm a freelance web engineer who loves great UX."),
    (
        "peru",
        "\u{1F1F5}\u{1F1EA}",
        "Originally from Poland, currently living in Lima, Peru.",
    ),
];

fn emoji(label: &str, symbol: &str) -> Element {
    span()
        .attr("role", "img")
        .attr("aria-label", label)
        .text(symbol)
}

fn bio_line() -> Element {
    div()
        .class("Bio-line")
        .style("margin-bottom", "6px")
        .style("font-size", "16px")
        .style("font-weight", "400")
        .style("line-height", "1.5rem")
}

/// The three bio lines, ending with a link to the Twitter profile
pub fn render_bio_text(twitter_handle: &str) -> Element {
    let lines = BIO_LINES
        .iter()
        .map(|(label, symbol, text)| bio_line().child(emoji(label, symbol)).text(format!(" {}", text)));

    let twitter = bio_line().child(emoji("sun", "\u{2600}\u{FE0F}")).child(
        anchor(format!("https://twitter.com/{}", twitter_handle)).text(" Follow me on Twitter"),
    );

    div()
        .class("Bio")
        .style("padding-left", "1.6rem")
        .style("text-indent", "-1.6rem")
        .children(lines)
        .child(twitter)
}
