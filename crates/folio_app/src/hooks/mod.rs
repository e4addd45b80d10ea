//! Stateful behaviors mounted by page components

pub mod email;
pub mod gradient;
pub mod mouse;

pub use email::{EmailReveal, RevealStage, RevealState, RevealTiming};
pub use gradient::{GradientRange, PointerGradient};
pub use mouse::{MouseTracker, PointerPosition};
