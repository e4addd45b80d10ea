//! Markup for the email entry of the link list

use crate::config::EmailConfig;
use crate::hooks::email::{RevealStage, RevealState};
use crate::markup::{div, span, Element};

/// Render the email link for the current reveal state
///
/// - hidden: the clickable label
/// - visible / splitting: the two halves, with transition classes while splitting
/// - merged: the whole address on one line
pub fn render_email_link(state: RevealState, email: &EmailConfig) -> Element {
    match state.stage() {
        RevealStage::Hidden => span()
            .class("App-link")
            .attr("role", "button")
            .child(div().text(email.label.as_str())),
        RevealStage::Visible | RevealStage::Splitting => span().class("App-link-email").child(
            div()
                .class("App-email")
                .child(
                    div()
                        .class("App-email-left")
                        .class_if(state.splitting, "App-email-left-transition")
                        .text(email.local_part()),
                )
                .child(
                    div()
                        .class("App-email-right")
                        .class_if(state.splitting, "App-email-right-transition")
                        .text(email.domain_part()),
                ),
        ),
        RevealStage::Merged => span().class("App-link-email").child(
            div()
                .class("App-email")
                .class("App-email-merged")
                .text(email.address()),
        ),
    }
}
