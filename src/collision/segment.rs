use nalgebra::Vector2;

use crate::ball::Ball;
use crate::config::EPSILON;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Straight-line motion record for one ball within the current tick.
///
/// `start` and `remaining` are re-based at every resolved sub-tick
/// collision, so `final_position` always reflects the projected end of
/// tick assuming no further collisions. `registered` means this
/// segment's outgoing collisions are already in the event queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSegment {
    pub start: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub remaining: f64,
    pub registered: bool,
}

impl PathSegment {
    pub fn from_ball(ball: &Ball) -> PathSegment {
        PathSegment {
            start: ball.position(),
            velocity: ball.velocity(),
            remaining: 1.0,
            registered: false,
        }
    }

    pub fn final_position(&self) -> Vector2<f64> {
        self.start + self.velocity * self.remaining
    }

    /// Moves the segment's time origin forward by `dt` ticks.
    pub fn advance(&mut self, dt: f64) {
        self.start += self.velocity * dt;
        self.remaining -= dt;
    }

    /// Writes the projected end-of-tick state back into the ball. The
    /// velocity may differ from the one the segment was built with if
    /// collisions redirected it.
    pub fn commit_to(&self, ball: &mut Ball) {
        ball.set_position(self.final_position());
        ball.set_velocity(self.velocity);
    }

    /// Time at which the ball's center reaches `half_extent - radius`
    /// (or the mirrored bound) along `axis`, counting only approaching
    /// motion within `[rewind, remaining]`.
    pub fn time_of_wall_collision(
        &self,
        axis: Axis,
        half_extent: f64,
        radius: f64,
        rewind: f64,
    ) -> Option<f64> {
        let (pos, vel) = match axis {
            Axis::X => (self.start.x, self.velocity.x),
            Axis::Y => (self.start.y, self.velocity.y),
        };
        if vel.abs() <= EPSILON {
            return None;
        }

        let t = (half_extent - radius - pos) / vel;
        if t >= rewind && t <= self.remaining && vel > 0. {
            return Some(t);
        }

        let t = (-half_extent + radius - pos) / vel;
        if t >= rewind && t <= self.remaining && vel < 0. {
            return Some(t);
        }

        None
    }

    /// First-contact time against another segment, from the relative
    /// motion quadratic `|relPos + t relVel|^2 = (2 radius)^2`.
    pub fn time_of_collision_with(
        &self,
        other: &PathSegment,
        radius: f64,
        rewind: f64,
    ) -> Option<f64> {
        let rel_vel = self.velocity - other.velocity;
        let rel_pos = self.start - other.start;

        let a = rel_vel.dot(&rel_vel);
        if a <= EPSILON {
            // Equal velocities, no converging motion.
            return None;
        }
        let b = 2. * rel_vel.dot(&rel_pos);
        let c = rel_pos.dot(&rel_pos) - 4. * radius * radius;

        let disc = b * b - 4. * a * c;
        if disc <= 0. {
            // The balls never meet, or exactly graze at one point.
            return None;
        }

        // The lower root is the entry into overlap, not the separation.
        let t = (-b - disc.sqrt()) / (2. * a);
        if t < rewind || t > self.remaining {
            return None;
        }
        Some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const REWIND: f64 = -1e-6;

    fn segment(start: (f64, f64), velocity: (f64, f64)) -> PathSegment {
        PathSegment {
            start: Vector2::new(start.0, start.1),
            velocity: Vector2::new(velocity.0, velocity.1),
            remaining: 1.0,
            registered: false,
        }
    }

    #[test]
    fn wall_time_counts_only_approaching_motion() {
        let seg = segment((0., 0.), (10., 0.));
        let t = seg
            .time_of_wall_collision(Axis::X, 8., 3., REWIND)
            .unwrap();
        assert_relative_eq!(t, 0.5);

        // Moving away from both x bounds reports nothing.
        let seg = segment((0., 0.), (0., 10.));
        assert_eq!(seg.time_of_wall_collision(Axis::X, 8., 3., REWIND), None);

        // Collision beyond the remaining time budget is out of reach.
        let seg = segment((0., 0.), (4., 0.));
        assert_eq!(seg.time_of_wall_collision(Axis::X, 8., 3., REWIND), None);
    }

    #[test]
    fn wall_time_hits_the_mirrored_bound() {
        let seg = segment((0., 0.), (-10., 0.));
        let t = seg
            .time_of_wall_collision(Axis::X, 8., 3., REWIND)
            .unwrap();
        assert_relative_eq!(t, 0.5);
    }

    #[test]
    fn head_on_contact_time() {
        // Gap of 10 between centers, combined contact distance 6, closing
        // at 5 per tick: contact after 4/5 of a tick.
        let a = segment((0., 0.), (0., 5.));
        let b = segment((0., 10.), (0., 0.));
        let t = a.time_of_collision_with(&b, 3., REWIND).unwrap();
        assert_relative_eq!(t, 0.8);
    }

    #[test]
    fn separating_balls_never_collide() {
        let a = segment((0., 0.), (0., -5.));
        let b = segment((0., 10.), (0., 0.));
        assert_eq!(a.time_of_collision_with(&b, 3., REWIND), None);
    }

    #[test]
    fn equal_velocities_never_collide() {
        let a = segment((0., 0.), (2., 1.));
        let b = segment((0., 7.), (2., 1.));
        assert_eq!(a.time_of_collision_with(&b, 3., REWIND), None);
    }

    #[test]
    fn exact_graze_is_no_collision() {
        // Passes at exactly the contact distance: discriminant is zero.
        let a = segment((-10., 6.), (5., 0.));
        let b = segment((0., 0.), (0., 0.));
        assert_eq!(a.time_of_collision_with(&b, 3., REWIND), None);
    }

    #[test]
    fn advance_preserves_final_position() {
        let mut seg = segment((1., 2.), (4., -2.));
        let final_pos = seg.final_position();
        seg.advance(0.25);
        assert_relative_eq!(seg.final_position().x, final_pos.x);
        assert_relative_eq!(seg.final_position().y, final_pos.y);
        assert_relative_eq!(seg.remaining, 0.75);
    }
}
