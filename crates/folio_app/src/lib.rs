//! Folio Application
//!
//! The portfolio landing page as a headless, deterministic UI runtime.
//! Components own their state, timers run on a [`folio_core::TimerQueue`]
//! driven by an injectable clock, springs are stepped by a
//! [`folio_animation::AnimationScheduler`], and everything renders to HTML
//! markup with inline styles.
//!
//! # Example
//!
//! ```rust
//! use folio_app::prelude::*;
//!
//! let runtime = PageRuntime::manual();
//! let page = IndexPage::mount(&runtime, &SiteConfig::default(), &mut RandomOffsets::seeded(7));
//!
//! page.click_email();
//! runtime.advance(1500);
//! assert!(page.render_html().contains("mmczaplinski@gmail.com"));
//! ```

pub mod components;
pub mod config;
pub mod error;
pub mod hooks;
pub mod markup;
pub mod page;
pub mod runtime;

pub use config::SiteConfig;
pub use error::{FolioError, Result};
pub use page::IndexPage;
pub use runtime::{FrameReport, PageRuntime, RuntimeStats};

/// Prelude for common imports
pub mod prelude {
    pub use crate::components::BlogIndex;
    pub use crate::config::{AnimationConfig, EmailConfig, LinkConfig, PostConfig, SiteConfig};
    pub use crate::error::{FolioError, Result};
    pub use crate::hooks::{RevealStage, RevealState};
    pub use crate::page::IndexPage;
    pub use crate::runtime::PageRuntime;

    pub use folio_animation::{OffsetSource, RandomOffsets, TrailItem};
    pub use folio_core::{Clock, ManualClock, SystemClock};
    pub use folio_theme::{Theme, Typography};
}
