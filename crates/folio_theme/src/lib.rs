//! Folio Theme
//!
//! Typography (vertical rhythm and modular scale) and the site palette.

pub mod theme;
pub mod typography;

pub use theme::{Palette, Theme};
pub use typography::{FontScale, Rem, Typography, TypographyConfig};
