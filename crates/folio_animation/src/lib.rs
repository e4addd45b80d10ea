//! Folio Animation System
//!
//! Spring physics and the staggered entrance trail.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Scheduler**: single-threaded frame stepping with substeps and tick callbacks
//! - **Animated Values**: scalars that register springs on first retarget
//! - **Entrance Trail**: chained springs that settle one after another
//! - **Injectable Randomness**: trail offsets come from an [`OffsetSource`]

pub mod scheduler;
pub mod spring;
pub mod trail;
pub mod values;

pub use scheduler::{
    AnimatedValue, AnimationScheduler, SchedulerHandle, SpringId, Springs, TickCallback,
    TickCallbackId,
};
pub use spring::{Spring, SpringConfig};
pub use trail::{
    EntranceTrail, OffsetRange, OffsetSource, RandomOffsets, TrailActivator, TrailConfig,
    TrailItem,
};
pub use values::{clamp_map, Interpolate, Offset};
