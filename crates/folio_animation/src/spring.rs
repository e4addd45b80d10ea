//! Spring physics animation
//!
//! RK4-integrated spring physics for the page's eased motion. Configurations
//! use stiffness/damping/mass; [`SpringConfig::from_tension_friction`] accepts
//! the tension/friction vocabulary the site's motion was tuned in.

/// Settling distance used when no precision is given (half a CSS pixel)
pub const DEFAULT_PRECISION: f32 = 0.5;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Create from mass/tension/friction (tension is stiffness, friction is damping)
    pub fn from_tension_friction(mass: f32, tension: f32, friction: f32) -> Self {
        Self::new(tension, friction, mass)
    }

    /// Create a critically damped spring: no overshoot, fastest settling
    pub fn critically_damped(stiffness: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping: 2.0 * (stiffness * mass).sqrt(),
            mass,
        }
    }

    /// The heavy, slightly bouncy spring used by the entrance trail
    pub fn trail() -> Self {
        Self::from_tension_friction(30.0, 1000.0, 200.0)
    }

    /// The settling spring used by the background gradient
    pub fn settle() -> Self {
        Self::critically_damped(120.0, 1.0)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self {
            stiffness: 400.0,
            damping: 30.0,
            mass: 1.0,
        }
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is critically damped (no oscillation, fastest settling)
    pub fn is_critically_damped(&self) -> bool {
        (self.damping - self.critical_damping()).abs() < 0.01
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }

    /// A config the integrator can run. Anything else snaps to rest.
    pub fn is_valid(&self) -> bool {
        self.mass > 0.0
            && self.stiffness >= 0.0
            && self.damping >= 0.0
            && self.mass.is_finite()
            && self.stiffness.is_finite()
            && self.damping.is_finite()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    precision: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self::with_precision(config, initial, DEFAULT_PRECISION)
    }

    /// Create a spring that settles within `precision` of its target
    ///
    /// Use a small precision for unit-range values such as opacity.
    pub fn with_precision(config: SpringConfig, initial: f32, precision: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            precision: precision.abs().max(f32::EPSILON),
        }
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to the target and stop
    pub fn snap(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }

    /// Check if the spring has settled (within precision of target with minimal velocity)
    pub fn is_settled(&self) -> bool {
        // Velocity threshold scales with precision: 0.5px -> 5px/s
        let velocity_epsilon = self.precision * 10.0;

        (self.value - self.target).abs() < self.precision
            && self.velocity.abs() < velocity_epsilon
    }

    /// Step the spring simulation using RK4 integration
    ///
    /// Non-positive or non-finite time steps leave the spring untouched.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        if self.is_settled() || !self.config.is_valid() {
            self.snap();
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;

        if !self.value.is_finite() || !self.velocity.is_finite() {
            tracing::warn!("spring diverged, snapping to target {}", self.target);
            self.snap();
        } else if self.is_settled() {
            self.snap();
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spring: &mut Spring, seconds: f32) {
        let frames = (seconds * 60.0) as usize;
        for _ in 0..frames {
            spring.step(1.0 / 60.0);
        }
    }

    #[test]
    fn test_spring_settles_to_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(100.0);

        run(&mut spring, 2.0);

        assert!(spring.is_settled());
        assert!((spring.value() - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_trail_config_settles_exactly() {
        let mut spring = Spring::new(SpringConfig::trail(), -250.0);
        spring.set_target(0.0);

        run(&mut spring, 10.0);

        // Settled springs snap, so the rest value is exact
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_spring_inherits_velocity() {
        let mut spring = Spring::new(SpringConfig::trail(), 0.0);
        spring.set_target(100.0);

        run(&mut spring, 0.2);

        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        // Change target mid-flight - velocity should continue
        spring.set_target(50.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_spring_presets() {
        assert!(SpringConfig::trail().is_underdamped());
        assert!(SpringConfig::stiff().is_underdamped());
        assert!(SpringConfig::settle().is_critically_damped());
    }

    #[test]
    fn test_critically_damped_never_overshoots() {
        let mut spring = Spring::new(SpringConfig::settle(), 20.0);
        spring.set_target(165.0);

        for _ in 0..600 {
            spring.step(1.0 / 60.0);
            assert!(spring.value() <= 165.0 + 1e-3);
        }
        assert_eq!(spring.value(), 165.0);
    }

    #[test]
    fn test_precision_for_unit_range() {
        let mut spring = Spring::with_precision(SpringConfig::trail(), 0.0, 0.001);
        spring.set_target(1.0);

        // With the default half-pixel precision this would already count as settled
        spring.step(1.0 / 60.0);
        assert!(!spring.is_settled());

        run(&mut spring, 10.0);
        assert_eq!(spring.value(), 1.0);
    }

    #[test]
    fn test_degenerate_steps_are_ignored() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(10.0);

        spring.step(0.0);
        spring.step(-1.0);
        spring.step(f32::NAN);
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn test_invalid_config_rests_at_target() {
        let mut spring = Spring::new(SpringConfig::new(100.0, 10.0, 0.0), 0.0);
        spring.set_target(42.0);

        spring.step(1.0 / 60.0);
        assert_eq!(spring.value(), 42.0);
        assert!(spring.is_settled());
    }

    #[test]
    fn test_spring_rk4_stability() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(1000.0);

        for _ in 0..100 {
            spring.step(0.1);
            assert!(spring.value() < 2000.0);
            assert!(spring.value() > -500.0);
        }
    }
}
