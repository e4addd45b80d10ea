//! Staggered entrance trail
//!
//! A group of N items that start scattered at random offsets, invisible, and
//! spring to rest once the trail is activated. Every item shares one spring
//! configuration; the stagger comes from chaining: item 0 targets rest and
//! each later item targets the previous item's *current* value on every
//! substep, so later items visibly lag earlier ones.
//!
//! ```rust
//! use folio_animation::{AnimationScheduler, EntranceTrail, TrailConfig};
//!
//! let scheduler = AnimationScheduler::new();
//! let mut unit = 0.0_f32;
//! let mut source = move || { unit = (unit + 0.37) % 1.0; unit };
//!
//! let trail = EntranceTrail::new(scheduler.handle(), 5, TrailConfig::default(), &mut source);
//! trail.activate();
//!
//! for _ in 0..1800 {
//!     scheduler.tick(1.0 / 60.0);
//! }
//! assert!(trail.is_settled());
//! ```

use std::cell::Cell;
use std::rc::{Rc, Weak};

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::scheduler::{SchedulerHandle, SpringId, Springs, TickCallbackId};
use crate::spring::{Spring, SpringConfig};
use crate::values::Offset;

// ============================================================================
// Offset Sources
// ============================================================================

/// Source of uniform samples in `[0, 1)` used to scatter trail items
pub trait OffsetSource {
    fn next_unit(&mut self) -> f32;
}

impl<F> OffsetSource for F
where
    F: FnMut() -> f32,
{
    fn next_unit(&mut self) -> f32 {
        self()
    }
}

/// Offset source backed by a `rand` generator
pub struct RandomOffsets<R: Rng = ThreadRng> {
    rng: R,
}

impl RandomOffsets<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomOffsets<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomOffsets<StdRng> {
    /// Reproducible offsets for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomOffsets<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> OffsetSource for RandomOffsets<R> {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Magnitude range for starting offsets, in CSS pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetRange {
    pub min: f32,
    pub max: f32,
}

impl OffsetRange {
    pub fn new(min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { min, max }
    }

    /// Draw a signed offset: magnitude in `[min, max]`, sign chosen at random
    pub fn sample(&self, source: &mut dyn OffsetSource) -> f32 {
        let magnitude = self.min + source.next_unit().clamp(0.0, 1.0) * (self.max - self.min);
        if source.next_unit() < 0.5 {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn contains_magnitude(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value.abs())
    }
}

impl Default for OffsetRange {
    fn default() -> Self {
        Self::new(100.0, 250.0)
    }
}

// ============================================================================
// Trail
// ============================================================================

/// Configuration shared by every item of a trail
#[derive(Clone, Copy, Debug)]
pub struct TrailConfig {
    pub spring: SpringConfig,
    pub offsets: OffsetRange,
    /// Settling precision for opacity, which lives in `[0, 1]`
    pub opacity_precision: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::trail(),
            offsets: OffsetRange::default(),
            opacity_precision: 0.001,
        }
    }
}

/// The animated values of one trail item
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailItem {
    pub offset: Offset,
    pub opacity: f32,
}

impl TrailItem {
    pub const REST: TrailItem = TrailItem {
        offset: Offset::ZERO,
        opacity: 1.0,
    };

    /// Inline CSS for this item
    pub fn style(&self) -> String {
        format!(
            "opacity: {}; transform: {}",
            self.opacity,
            self.offset.translate3d()
        )
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct TrailSprings {
    x: SpringId,
    y: SpringId,
    opacity: SpringId,
}

impl TrailSprings {
    fn ids(&self) -> [SpringId; 3] {
        [self.x, self.y, self.opacity]
    }
}

struct TrailShared {
    activated: Cell<bool>,
}

fn activate_lead(handle: &SchedulerHandle, shared: &TrailShared, lead: Option<TrailSprings>) -> bool {
    if shared.activated.replace(true) {
        return false;
    }

    if let Some(lead) = lead {
        handle.set_spring_target(lead.x, 0.0);
        handle.set_spring_target(lead.y, 0.0);
        handle.set_spring_target(lead.opacity, 1.0);
    }
    tracing::debug!("entrance trail activated");
    true
}

/// Retarget each follower to its predecessor's current value
fn chain_followers(springs: &mut Springs, items: &[TrailSprings]) {
    for pair in items.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        for (lead, follower) in prev.ids().into_iter().zip(next.ids()) {
            let Some(value) = springs.get(lead).map(|s| s.value()) else {
                continue;
            };
            if let Some(spring) = springs.get_mut(follower) {
                spring.set_target(value);
            }
        }
    }
}

/// A staggered group animation driven by a single `activated` toggle
pub struct EntranceTrail {
    handle: SchedulerHandle,
    springs: SmallVec<[TrailSprings; 8]>,
    initial: SmallVec<[TrailItem; 8]>,
    shared: Rc<TrailShared>,
    callback: Option<TickCallbackId>,
}

impl EntranceTrail {
    /// Scatter `count` items and register their springs
    ///
    /// Offsets are drawn here, once; rendering never redraws them.
    pub fn new(
        handle: SchedulerHandle,
        count: usize,
        config: TrailConfig,
        source: &mut dyn OffsetSource,
    ) -> Self {
        let mut springs: SmallVec<[TrailSprings; 8]> = SmallVec::new();
        let mut initial: SmallVec<[TrailItem; 8]> = SmallVec::new();

        for _ in 0..count {
            let offset = Offset::new(config.offsets.sample(source), config.offsets.sample(source));
            let item = TrailItem {
                offset,
                opacity: 0.0,
            };

            // A dead scheduler yields null ids; reads then fall back to plain values
            let register = |spring: Spring| handle.register_spring(spring).unwrap_or_default();
            springs.push(TrailSprings {
                x: register(Spring::new(config.spring, offset.x)),
                y: register(Spring::new(config.spring, offset.y)),
                opacity: register(Spring::with_precision(
                    config.spring,
                    0.0,
                    config.opacity_precision,
                )),
            });
            initial.push(item);
        }

        let shared = Rc::new(TrailShared {
            activated: Cell::new(false),
        });

        let chained = springs.clone();
        let weak: Weak<TrailShared> = Rc::downgrade(&shared);
        let callback = handle.add_tick_callback(move |springs| {
            let active = weak.upgrade().map(|s| s.activated.get()).unwrap_or(false);
            if active {
                chain_followers(springs, &chained);
            }
        });

        tracing::debug!("entrance trail mounted with {} items", count);

        Self {
            handle,
            springs,
            initial,
            shared,
            callback,
        }
    }

    pub fn len(&self) -> usize {
        self.initial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }

    pub fn is_activated(&self) -> bool {
        self.shared.activated.get()
    }

    /// Flip the trail to its resting targets. Only the first call has an effect.
    pub fn activate(&self) -> bool {
        activate_lead(&self.handle, &self.shared, self.springs.first().copied())
    }

    /// A weak activator for deferred callbacks
    pub fn activator(&self) -> TrailActivator {
        TrailActivator {
            handle: self.handle.clone(),
            shared: Rc::downgrade(&self.shared),
            lead: self.springs.first().copied(),
        }
    }

    /// The scattered starting values drawn at mount
    pub fn initial_items(&self) -> &[TrailItem] {
        &self.initial
    }

    /// Current animated values of every item
    pub fn items(&self) -> Vec<TrailItem> {
        let activated = self.is_activated();

        self.springs
            .iter()
            .zip(self.initial.iter())
            .map(|(ids, initial)| {
                // Missing springs degrade to the state the trail is heading for
                let fallback = if activated { TrailItem::REST } else { *initial };
                TrailItem {
                    offset: Offset::new(
                        self.handle
                            .get_spring_value(ids.x)
                            .unwrap_or(fallback.offset.x),
                        self.handle
                            .get_spring_value(ids.y)
                            .unwrap_or(fallback.offset.y),
                    ),
                    // The spring may overshoot; CSS opacity does not
                    opacity: self
                        .handle
                        .get_spring_value(ids.opacity)
                        .unwrap_or(fallback.opacity)
                        .clamp(0.0, 1.0),
                }
            })
            .collect()
    }

    /// True once activated and every item is at rest
    pub fn is_settled(&self) -> bool {
        self.is_activated()
            && self
                .items()
                .iter()
                .all(|item| *item == TrailItem::REST)
    }
}

impl Drop for EntranceTrail {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            self.handle.remove_tick_callback(callback);
        }
        for ids in &self.springs {
            for id in ids.ids() {
                self.handle.remove_spring(id);
            }
        }
    }
}

/// Activates a trail from a deferred callback without owning it
///
/// Does nothing once the trail has been dropped.
#[derive(Clone)]
pub struct TrailActivator {
    handle: SchedulerHandle,
    shared: Weak<TrailShared>,
    lead: Option<TrailSprings>,
}

impl TrailActivator {
    pub fn activate(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => activate_lead(&self.handle, &shared, self.lead),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::AnimationScheduler;

    fn settle(scheduler: &AnimationScheduler, seconds: f32) {
        for _ in 0..(seconds * 60.0) as usize {
            scheduler.tick(1.0 / 60.0);
        }
    }

    #[test]
    fn test_initial_offsets_in_range() {
        let scheduler = AnimationScheduler::new();
        let mut source = RandomOffsets::seeded(7);
        let config = TrailConfig::default();

        let trail = EntranceTrail::new(scheduler.handle(), 6, config, &mut source);

        assert_eq!(trail.len(), 6);
        for item in trail.items() {
            assert!(config.offsets.contains_magnitude(item.offset.x));
            assert!(config.offsets.contains_magnitude(item.offset.y));
            assert_eq!(item.opacity, 0.0);
        }
    }

    #[test]
    fn test_offset_sign_follows_source() {
        let range = OffsetRange::default();

        let mut values = [0.0_f32, 0.2].into_iter().cycle();
        let mut negative = move || values.next().unwrap_or(0.0);
        assert_eq!(range.sample(&mut negative), -100.0);

        let mut values = [1.0_f32, 0.9].into_iter().cycle();
        let mut positive = move || values.next().unwrap_or(0.0);
        assert_eq!(range.sample(&mut positive), 250.0);
    }

    #[test]
    fn test_trail_settles_exactly_at_rest() {
        let scheduler = AnimationScheduler::new();
        let mut source = RandomOffsets::seeded(42);
        let trail = EntranceTrail::new(scheduler.handle(), 6, TrailConfig::default(), &mut source);

        // Nothing moves before activation
        settle(&scheduler, 1.0);
        assert_eq!(trail.items(), trail.initial_items());

        assert!(trail.activate());
        settle(&scheduler, 30.0);

        assert!(trail.is_settled());
        for item in trail.items() {
            assert_eq!(item.offset, Offset::ZERO);
            assert_eq!(item.opacity, 1.0);
        }
    }

    #[test]
    fn test_later_items_lag() {
        let scheduler = AnimationScheduler::new();
        // Every item starts at (-145, -145)
        let mut source = || 0.3_f32;
        let trail = EntranceTrail::new(scheduler.handle(), 3, TrailConfig::default(), &mut source);
        assert_eq!(trail.items()[0].offset, Offset::new(-145.0, -145.0));

        trail.activate();
        settle(&scheduler, 0.3);

        let items = trail.items();
        assert!(items[0].offset.x > items[1].offset.x);
        assert!(items[1].offset.x > items[2].offset.x);
        assert!(items[0].opacity > items[1].opacity);
    }

    #[test]
    fn test_activate_is_one_shot() {
        let scheduler = AnimationScheduler::new();
        let mut source = RandomOffsets::seeded(1);
        let trail = EntranceTrail::new(scheduler.handle(), 2, TrailConfig::default(), &mut source);
        let activator = trail.activator();

        assert!(activator.activate());
        assert!(!trail.activate());
        assert!(!activator.activate());
    }

    #[test]
    fn test_activator_after_drop_is_noop() {
        let scheduler = AnimationScheduler::new();
        let mut source = RandomOffsets::seeded(1);
        let trail = EntranceTrail::new(scheduler.handle(), 2, TrailConfig::default(), &mut source);
        let activator = trail.activator();

        drop(trail);
        assert_eq!(scheduler.spring_count(), 0);
        assert_eq!(scheduler.tick_callback_count(), 0);
        assert!(!activator.activate());
    }

    #[test]
    fn test_dead_scheduler_degrades_to_rest() {
        let handle = AnimationScheduler::new().handle();
        let mut source = RandomOffsets::seeded(3);
        let trail = EntranceTrail::new(handle, 4, TrailConfig::default(), &mut source);

        assert_eq!(trail.items(), trail.initial_items());
        trail.activate();
        assert!(trail.is_settled());
    }

    #[test]
    fn test_item_style() {
        let item = TrailItem {
            offset: Offset::new(-150.0, 120.0),
            opacity: 0.5,
        };
        assert_eq!(
            item.style(),
            "opacity: 0.5; transform: translate3d(-150px, 120px, 0)"
        );
    }
}
