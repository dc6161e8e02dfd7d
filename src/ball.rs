use nalgebra::{Rotation3, Unit, Vector2, Vector3};

use crate::config::EPSILON;

/// Mutable physical state of one ball.
///
/// Velocity is stored split into a unit direction and a scalar speed in
/// distance per tick; a stopped ball holds the zero vector as direction.
/// Inactive balls (pocketed by the rules layer) are skipped by the engine
/// but keep their state.
#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    position: Vector2<f64>,
    direction: Vector2<f64>,
    speed: f64,
    active: bool,
    rotation: Rotation3<f64>,
}

impl Ball {
    /// # Panics
    ///
    /// Panics if `position` is not finite.
    pub fn new(position: Vector2<f64>) -> Ball {
        assert!(
            position.x.is_finite() && position.y.is_finite(),
            "ball position must be finite"
        );
        Ball {
            position,
            direction: Vector2::zeros(),
            speed: 0.,
            active: true,
            rotation: Rotation3::identity(),
        }
    }

    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    /// Unit direction of travel, or the zero vector when stopped.
    pub fn direction(&self) -> Vector2<f64> {
        self.direction
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn velocity(&self) -> Vector2<f64> {
        self.direction * self.speed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Accumulated roll, for consumers that render the ball.
    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }

    /// # Panics
    ///
    /// Panics if `position` is not finite.
    pub fn set_position(&mut self, position: Vector2<f64>) {
        assert!(
            position.x.is_finite() && position.y.is_finite(),
            "ball position must be finite"
        );
        self.position = position;
    }

    /// Splits `velocity` into speed and direction, collapsing to the zero
    /// vector at zero speed.
    ///
    /// # Panics
    ///
    /// Panics if `velocity` is not finite.
    pub fn set_velocity(&mut self, velocity: Vector2<f64>) {
        assert!(
            velocity.x.is_finite() && velocity.y.is_finite(),
            "ball velocity must be finite"
        );
        self.speed = velocity.norm();
        if self.speed <= EPSILON {
            self.speed = 0.;
            self.direction = Vector2::zeros();
        } else {
            self.direction = velocity / self.speed;
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.speed <= EPSILON
    }

    /// Per-tick friction: a ball at or below the stop threshold halts
    /// outright, otherwise its speed is scaled down. Call after all
    /// position updates for the tick.
    pub fn apply_friction(&mut self, friction_fraction: f64, stop_threshold: f64) {
        if self.speed <= stop_threshold {
            self.speed = 0.;
            self.direction = Vector2::zeros();
        } else {
            self.speed *= friction_fraction;
        }
    }

    /// Accumulates roll about the horizontal axis perpendicular to travel,
    /// by `speed / radius` radians per tick.
    pub fn update_rotation(&mut self, ball_radius: f64) {
        if self.is_stopped() {
            return;
        }
        let heading = Vector3::new(self.direction.x, self.direction.y, 0.);
        let axis = Vector3::z().cross(&heading);
        if let Some(axis) = Unit::try_new(axis, EPSILON) {
            self.rotation = Rotation3::from_axis_angle(&axis, self.speed / ball_radius) * self.rotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn set_velocity_derives_speed_and_direction() {
        let mut ball = Ball::new(Vector2::zeros());
        ball.set_velocity(Vector2::new(3., 4.));
        assert_relative_eq!(ball.speed(), 5.);
        assert_relative_eq!(ball.direction().x, 0.6);
        assert_relative_eq!(ball.direction().y, 0.8);
        assert!(!ball.is_stopped());
    }

    #[test]
    fn zero_velocity_collapses_direction() {
        let mut ball = Ball::new(Vector2::zeros());
        ball.set_velocity(Vector2::new(1., 0.));
        ball.set_velocity(Vector2::zeros());
        assert!(ball.is_stopped());
        assert_eq!(ball.direction(), Vector2::zeros());
    }

    #[test]
    fn friction_scales_then_snaps() {
        let mut ball = Ball::new(Vector2::zeros());
        ball.set_velocity(Vector2::new(0., 1.));
        ball.apply_friction(0.99, 0.01);
        assert_relative_eq!(ball.speed(), 0.99);

        ball.set_velocity(Vector2::new(0., 0.01));
        ball.apply_friction(0.99, 0.01);
        assert_eq!(ball.speed(), 0.);
        assert!(ball.is_stopped());
    }

    #[test]
    fn rotation_accumulates_while_moving() {
        let mut ball = Ball::new(Vector2::zeros());
        ball.set_velocity(Vector2::new(0., 3.));
        let before = *ball.rotation();
        ball.update_rotation(3.);
        assert_ne!(*ball.rotation(), before);

        ball.set_velocity(Vector2::zeros());
        let before = *ball.rotation();
        ball.update_rotation(3.);
        assert_eq!(*ball.rotation(), before);
    }

    #[test]
    #[should_panic]
    fn non_finite_velocity_is_rejected() {
        let mut ball = Ball::new(Vector2::zeros());
        ball.set_velocity(Vector2::new(f64::NAN, 0.));
    }

    #[test]
    #[should_panic]
    fn non_finite_position_is_rejected() {
        let mut ball = Ball::new(Vector2::zeros());
        ball.set_position(Vector2::new(0., f64::INFINITY));
    }
}
