use cityscape_common::Viewpoint;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tuning for the viewpoint integrator. The defaults assume `dt` in
/// milliseconds and velocity in grid units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub max_speed: f32,
    /// Exponential approach rate toward the target velocity, per unit of `dt`.
    pub acceleration_lambda: f32,
    /// Rate multiplier applied while coasting to a stop with no input held.
    pub return_to_zero_modifier: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_speed: 0.15,
            acceleration_lambda: 0.005,
            return_to_zero_modifier: 0.2,
        }
    }
}

/// Errors from motion configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MotionError {
    #[error("max speed must be positive and finite, got {0}")]
    NonPositiveMaxSpeed(f32),
    #[error("acceleration lambda must be positive and finite, got {0}")]
    NonPositiveAcceleration(f32),
    #[error("return-to-zero modifier must be in (0, 1), got {0}")]
    InvalidReturnModifier(f32),
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), MotionError> {
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(MotionError::NonPositiveMaxSpeed(self.max_speed));
        }
        let lambda = self.acceleration_lambda;
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(MotionError::NonPositiveAcceleration(lambda));
        }
        let m = self.return_to_zero_modifier;
        if !(m > 0.0 && m < 1.0) {
            return Err(MotionError::InvalidReturnModifier(m));
        }
        Ok(())
    }
}

/// Rate multiplier for the exponential smoothing step.
///
/// Coasting uses the configured damping. Steering within 90° of the current
/// heading uses 1. Reversing is boosted up to 1.5x for a head-on turn.
pub fn direction_modifier(config: &MotionConfig, velocity: Vec3, target_dir: Vec3) -> f32 {
    if target_dir == Vec3::ZERO {
        return config.return_to_zero_modifier;
    }
    let dot = velocity.normalize_or_zero().dot(target_dir);
    if dot > 0.0 { 1.0 } else { 1.0 - dot / 2.0 }
}

/// Turns the active input set into smoothed velocity and position.
///
/// Sole writer of the [`Viewpoint`].
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    config: MotionConfig,
    viewpoint: Viewpoint,
}

impl MotionIntegrator {
    pub fn new(config: MotionConfig, start: Vec3) -> Result<Self, MotionError> {
        config.validate()?;
        Ok(Self {
            config,
            viewpoint: Viewpoint::at(start),
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        &self.viewpoint
    }

    pub fn position(&self) -> Vec3 {
        self.viewpoint.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.viewpoint.velocity
    }

    /// Advance one tick and return the new position.
    ///
    /// `dt` must be finite and non-negative; the caller validates it.
    pub fn tick(&mut self, dt: f32, directions: impl IntoIterator<Item = Vec3>) -> Vec3 {
        debug_assert!(dt.is_finite() && dt >= 0.0, "invalid dt {dt}");

        let target_dir = directions
            .into_iter()
            .fold(Vec3::ZERO, |sum, dir| sum + dir)
            .normalize_or_zero();
        let target_velocity = target_dir * self.config.max_speed;

        let modifier = direction_modifier(&self.config, self.viewpoint.velocity, target_dir);
        let alpha = 1.0 - (-self.config.acceleration_lambda * modifier * dt).exp();

        let velocity = self
            .viewpoint
            .velocity
            .lerp(target_velocity, alpha)
            .clamp_length_max(self.config.max_speed);
        debug_assert!(velocity.is_finite(), "velocity diverged: {velocity}");

        self.viewpoint.velocity = velocity;
        self.viewpoint.position += velocity;
        tracing::trace!(
            speed = velocity.length(),
            modifier,
            x = self.viewpoint.position.x,
            z = self.viewpoint.position.z,
            "viewpoint advanced"
        );
        self.viewpoint.position
    }

    /// Stop immediately without moving.
    pub fn halt(&mut self) {
        self.viewpoint.velocity = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGHT: Vec3 = Vec3::X;
    const LEFT: Vec3 = Vec3::NEG_X;
    const FORWARD: Vec3 = Vec3::NEG_Z;
    const IDLE: [Vec3; 0] = [];

    fn integrator() -> MotionIntegrator {
        MotionIntegrator::new(MotionConfig::default(), Vec3::ZERO).unwrap()
    }

    #[test]
    fn default_constants() {
        let config = MotionConfig::default();
        assert_eq!(config.max_speed, 0.15);
        assert_eq!(config.acceleration_lambda, 0.005);
        assert_eq!(config.return_to_zero_modifier, 0.2);
    }

    #[test]
    fn idle_stays_put() {
        let mut m = integrator();
        for _ in 0..10 {
            m.tick(16.0, IDLE);
        }
        assert_eq!(m.position(), Vec3::ZERO);
        assert_eq!(m.velocity(), Vec3::ZERO);
    }

    #[test]
    fn first_tick_follows_the_smoothing_formula() {
        let mut m = integrator();
        let pos = m.tick(16.0, [RIGHT]);
        let alpha = 1.0 - (-0.005f32 * 16.0).exp();
        assert!((m.velocity().x - 0.15 * alpha).abs() < 1e-7);
        assert_eq!(pos, m.velocity());
    }

    #[test]
    fn velocity_approaches_max_speed() {
        let mut m = integrator();
        for _ in 0..500 {
            m.tick(16.0, [RIGHT]);
        }
        assert!((m.velocity().length() - 0.15).abs() < 1e-4);
        assert!(m.position().x > 0.0);
    }

    #[test]
    fn opposing_inputs_cancel() {
        let mut m = integrator();
        m.tick(16.0, [RIGHT, LEFT]);
        assert_eq!(m.velocity(), Vec3::ZERO);
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let mut m = integrator();
        for _ in 0..2000 {
            m.tick(16.0, [RIGHT, FORWARD]);
        }
        assert!(m.velocity().length() <= 0.15 + 1e-6);
        assert!((m.velocity().x + m.velocity().z).abs() < 1e-5);
    }

    #[test]
    fn modifiers_by_heading() {
        let config = MotionConfig::default();
        let v = Vec3::new(0.1, 0.0, 0.0);
        assert_eq!(direction_modifier(&config, v, Vec3::ZERO), 0.2);
        assert_eq!(direction_modifier(&config, v, RIGHT), 1.0);
        assert_eq!(direction_modifier(&config, v, LEFT), 1.5);
        assert_eq!(direction_modifier(&config, v, FORWARD), 1.0);
        assert_eq!(direction_modifier(&config, Vec3::ZERO, RIGHT), 1.0);
    }

    #[test]
    fn reversing_is_faster_than_coasting() {
        let mut reversing = integrator();
        let mut coasting = integrator();
        for _ in 0..200 {
            reversing.tick(16.0, [RIGHT]);
            coasting.tick(16.0, [RIGHT]);
        }
        let start = reversing.velocity().x;
        reversing.tick(16.0, [LEFT]);
        coasting.tick(16.0, IDLE);
        let reversing_drop = start - reversing.velocity().x;
        let coasting_drop = start - coasting.velocity().x;
        assert!(reversing_drop > coasting_drop);
    }

    #[test]
    fn coasting_decays_toward_zero() {
        let mut m = integrator();
        for _ in 0..200 {
            m.tick(16.0, [RIGHT]);
        }
        let moving = m.velocity().length();
        for _ in 0..600 {
            m.tick(16.0, IDLE);
        }
        assert!(m.velocity().length() < moving * 0.01);
    }

    #[test]
    fn zero_dt_keeps_velocity() {
        let mut m = integrator();
        m.tick(16.0, [RIGHT]);
        let v = m.velocity();
        m.tick(0.0, [LEFT]);
        assert_eq!(m.velocity(), v);
    }

    #[test]
    fn smoothing_is_frame_rate_independent() {
        let mut coarse = integrator();
        let mut fine = integrator();
        let alpha_coarse = {
            coarse.tick(32.0, [RIGHT]);
            coarse.velocity().x
        };
        let alpha_fine = {
            // Heading is unchanged, so the modifier stays 1 and two half
            // steps compose into one full step.
            fine.tick(16.0, [RIGHT]);
            fine.tick(16.0, [RIGHT]);
            fine.velocity().x
        };
        assert!((alpha_coarse - alpha_fine).abs() < 1e-6);
    }

    #[test]
    fn halt_zeroes_velocity() {
        let mut m = integrator();
        m.tick(16.0, [RIGHT]);
        m.halt();
        assert_eq!(m.velocity(), Vec3::ZERO);
    }

    #[test]
    fn invalid_configs_rejected() {
        let zero_speed = MotionConfig {
            max_speed: 0.0,
            ..MotionConfig::default()
        };
        assert_eq!(
            MotionIntegrator::new(zero_speed, Vec3::ZERO).unwrap_err(),
            MotionError::NonPositiveMaxSpeed(0.0)
        );
        let bad_lambda = MotionConfig {
            acceleration_lambda: -1.0,
            ..MotionConfig::default()
        };
        assert_eq!(
            bad_lambda.validate(),
            Err(MotionError::NonPositiveAcceleration(-1.0))
        );
        let bad_modifier = MotionConfig {
            return_to_zero_modifier: 1.0,
            ..MotionConfig::default()
        };
        assert_eq!(
            bad_modifier.validate(),
            Err(MotionError::InvalidReturnModifier(1.0))
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_input() -> impl Strategy<Value = Vec<Vec3>> {
            prop::collection::vec(
                prop::sample::select(vec![RIGHT, LEFT, FORWARD, Vec3::Z]),
                0..3,
            )
        }

        proptest! {
            #[test]
            fn speed_never_exceeds_max(
                steps in prop::collection::vec((0.0f32..10_000.0, any_input()), 1..60),
            ) {
                let mut m = integrator();
                for (dt, dirs) in steps {
                    m.tick(dt, dirs);
                    prop_assert!(m.velocity().length() <= 0.15 * (1.0 + 1e-6));
                    prop_assert!(m.position().is_finite());
                }
            }
        }
    }
}
