//! The landing page
//!
//! Mounting wires every behavior of the page to the runtime:
//!
//! - the cube, with its rotate-once timer
//! - the entrance trail over the link list, activated by a zero-delay timer
//! - the pointer gradient behind everything
//! - the email reveal sequencer, started by [`IndexPage::click_email`]
//!
//! Unmounting (or dropping the page) cancels every timer and removes the
//! pointer listener.

use folio_animation::{EntranceTrail, OffsetSource, RandomOffsets, TrailConfig, TrailItem};
use folio_core::ScheduledTimer;
use folio_theme::Typography;

use crate::components::{
    link_entries, render_email_link, render_link, render_trail, Cube, IndexLayout, LinkEntry,
};
use crate::config::SiteConfig;
use crate::hooks::{EmailReveal, GradientRange, PointerGradient, RevealState, RevealTiming};
use crate::markup::{div, Element};
use crate::runtime::PageRuntime;

/// Path the landing page is served at
pub const INDEX_PATH: &str = "/";

/// The mounted landing page
pub struct IndexPage {
    config: SiteConfig,
    typography: Typography,
    entries: Vec<LinkEntry>,
    cube: Cube,
    trail: EntranceTrail,
    activation: ScheduledTimer,
    gradient: PointerGradient,
    email: EmailReveal,
    mounted: bool,
}

impl IndexPage {
    /// Mount with trail offsets drawn from `source`
    pub fn mount(runtime: &PageRuntime, config: &SiteConfig, source: &mut dyn OffsetSource) -> Self {
        let animation = &config.animation;
        let timers = runtime.timer_handle();
        let entries = link_entries(config);

        let cube = Cube::mount(&timers, animation.rotate_once_ms);

        let trail_config = TrailConfig {
            offsets: animation.trail_offsets(),
            ..TrailConfig::default()
        };
        let trail = EntranceTrail::new(runtime.scheduler_handle(), entries.len(), trail_config, source);

        let activator = trail.activator();
        let activation = timers.schedule_scoped(0, "trail-activate", move || {
            activator.activate();
        });

        let gradient = PointerGradient::mount(
            &runtime.dispatcher_handle(),
            runtime.scheduler_handle(),
            runtime.shared_viewport(),
            GradientRange::new(animation.gradient_min_deg, animation.gradient_max_deg),
        );

        let email = EmailReveal::new(
            timers,
            RevealTiming::new(animation.split_delay_ms, animation.merge_delay_ms),
        );

        tracing::debug!("index page mounted with {} links", entries.len());

        Self {
            config: config.clone(),
            typography: config.theme.typography(),
            entries,
            cube,
            trail,
            activation,
            gradient,
            email,
            mounted: true,
        }
    }

    /// Mount with offsets from the thread-local random generator
    pub fn mount_random(runtime: &PageRuntime, config: &SiteConfig) -> Self {
        Self::mount(runtime, config, &mut RandomOffsets::new())
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Click on the email link. Returns true if this started the reveal.
    pub fn click_email(&self) -> bool {
        if !self.mounted {
            return false;
        }
        self.email.start()
    }

    pub fn hover_cube(&self, hovered: bool) {
        if self.mounted {
            self.cube.hover(hovered);
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn email_state(&self) -> RevealState {
        self.email.state()
    }

    pub fn trail_items(&self) -> Vec<TrailItem> {
        self.trail.items()
    }

    pub fn is_trail_activated(&self) -> bool {
        self.trail.is_activated()
    }

    pub fn is_trail_settled(&self) -> bool {
        self.trail.is_settled()
    }

    pub fn gradient(&self) -> &PointerGradient {
        &self.gradient
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn render(&self) -> Element {
        let links = self
            .entries
            .iter()
            .map(|entry| match entry {
                LinkEntry::Link(link) => render_link(link),
                LinkEntry::Email => render_email_link(self.email.state(), &self.config.email),
            })
            .map(|link| div().child(link))
            .collect();

        let content = vec![render_trail(links, &self.trail.items())];
        let layout = IndexLayout {
            title: &self.config.site.title,
            location: INDEX_PATH,
        }
        .render(&self.typography, self.cube.render(), content);

        div()
            .class("Page")
            .style("width", "100vw")
            .style("height", "100vh")
            .style("background-color", self.config.theme.palette.page_background.as_str())
            .style(
                "background",
                self.config.theme.gradient_css(self.gradient.angle_deg()),
            )
            .child(layout)
    }

    pub fn render_html(&self) -> String {
        self.render().to_html()
    }

    /// A standalone HTML document of the current state
    pub fn render_document(&self) -> String {
        let site = &self.config.site;
        let description = site
            .description
            .as_deref()
            .map(|description| {
                format!(
                    "<meta name=\"description\" content=\"{}\">",
                    html_escape::encode_double_quoted_attribute(description)
                )
            })
            .unwrap_or_default();

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}\n<style>\n{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            html_escape::encode_text(&site.title),
            description,
            self.config.theme.global_css(),
            self.render_html()
        )
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Tear down every behavior. Calling this more than once is harmless.
    pub fn unmount(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        self.mounted = false;

        self.activation.cancel();
        self.cube.unmount();
        self.email.cancel();
        self.gradient.unmount();

        tracing::debug!("index page unmounted");
        true
    }
}

impl Drop for IndexPage {
    fn drop(&mut self) {
        self.unmount();
    }
}
