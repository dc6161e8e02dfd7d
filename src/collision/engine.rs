use fnv::FnvHashSet;
use log::{debug, warn};
use nalgebra::Vector2;

use super::event::{CollisionEvent, EventKind, EventQueue};
use super::segment::{Axis, PathSegment};
use crate::ball::Ball;
use crate::config::{ConfigError, TableConfig, TuningConfig, EPSILON};

/// Owns the balls and resolves one tick of motion per `advance` call,
/// draining every sub-tick collision in chronological order.
///
/// Each tick it materializes one `PathSegment` per ball, collects every
/// candidate collision into the event queue, then repeatedly pops the
/// earliest event, moves the whole system's clock to it, applies the
/// response and re-collects for the redirected segments. Callers may
/// mutate balls (a cue strike, a pocket capture) only between ticks.
pub struct CollisionEngine {
    table: TableConfig,
    tuning: TuningConfig,
    balls: Vec<Ball>,
    segments: Vec<PathSegment>,
    queue: EventQueue,
    stale: FnvHashSet<usize>,
    overflow_count: u64,
}

impl CollisionEngine {
    pub fn new(
        table: TableConfig,
        tuning: TuningConfig,
        initial_positions: &[Vector2<f64>],
    ) -> Result<CollisionEngine, ConfigError> {
        let table = table.validate()?;
        let tuning = tuning.validate()?;
        let balls = initial_positions.iter().map(|p| Ball::new(*p)).collect();
        Ok(CollisionEngine {
            table,
            tuning,
            balls,
            segments: Vec::new(),
            queue: EventQueue::default(),
            stale: FnvHashSet::default(),
            overflow_count: 0,
        })
    }

    pub fn table(&self) -> &TableConfig {
        &self.table
    }

    pub fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, index: usize) -> &Ball {
        &self.balls[index]
    }

    pub fn ball_mut(&mut self, index: usize) -> &mut Ball {
        &mut self.balls[index]
    }

    /// Times one tick's resolve loop ran out of its iteration cap. A
    /// nonzero count signals degenerate input, not a normal outcome.
    pub fn overflow_count(&self) -> u64 {
        self.overflow_count
    }

    pub fn all_stopped(&self) -> bool {
        self.balls
            .iter()
            .all(|ball| !ball.is_active() || ball.is_stopped())
    }

    /// Restores every ball to the given position, at rest and active.
    ///
    /// # Panics
    ///
    /// Panics if `positions` does not match the ball count.
    pub fn reset_positions(&mut self, positions: &[Vector2<f64>]) {
        assert_eq!(
            positions.len(),
            self.balls.len(),
            "one position per ball required"
        );
        for (ball, position) in self.balls.iter_mut().zip(positions) {
            ball.set_position(*position);
            ball.set_velocity(Vector2::zeros());
            ball.set_active(true);
        }
    }

    /// Advances the simulation by one tick, resolving all collisions that
    /// occur within it.
    pub fn advance(&mut self) {
        if self.all_stopped() {
            return;
        }

        self.segments.clear();
        self.segments
            .extend(self.balls.iter().map(PathSegment::from_ball));
        // Inactive balls take no part in detection; park their segments.
        for (segment, ball) in self.segments.iter_mut().zip(&self.balls) {
            if !ball.is_active() {
                segment.velocity = Vector2::zeros();
                segment.registered = true;
            }
        }
        self.queue.clear();
        self.collect_events();

        let mut iterations = 0;
        while !self.queue.is_empty() {
            if iterations == self.tuning.max_iterations {
                self.overflow_count += 1;
                warn!(
                    "resolve loop hit the {}-iteration cap with {} events pending; committing partial state",
                    self.tuning.max_iterations,
                    self.queue.len()
                );
                break;
            }
            iterations += 1;

            let (event, time) = self.queue.pop().expect("Impossible");
            debug!("resolving {:?} at t={}", event, time);
            self.resolve(event, time);
            self.queue.rebase(time);
            self.collect_events();
        }

        for (segment, ball) in self.segments.iter().zip(self.balls.iter_mut()) {
            if !ball.is_active() {
                continue;
            }
            segment.commit_to(ball);
            ball.update_rotation(self.table.ball_radius);
            ball.apply_friction(self.tuning.friction_fraction, self.tuning.stop_threshold);
        }
    }

    /// Moves the whole system's clock to the event and applies the
    /// physical response to the involved segments. Every other pending
    /// event time is relative to "now", so all segments advance together.
    fn resolve(&mut self, event: CollisionEvent, time: f64) {
        for segment in &mut self.segments {
            segment.advance(time);
        }

        self.stale.clear();
        match event.kind {
            EventKind::WallX => {
                let segment = &mut self.segments[event.primary];
                segment.velocity.x = -segment.velocity.x;
                segment.registered = false;
                self.stale.insert(event.primary);
            }
            EventKind::WallY => {
                let segment = &mut self.segments[event.primary];
                segment.velocity.y = -segment.velocity.y;
                segment.registered = false;
                self.stale.insert(event.primary);
            }
            EventKind::BallBall => {
                let other = event.secondary.expect("Impossible");
                let mut first = self.segments[event.primary];
                let mut second = self.segments[other];

                let centers = first.start - second.start;
                let distance = centers.norm();
                if distance > EPSILON {
                    // Exchange the normal component of the relative
                    // velocity along the line of centers; tangential
                    // components are untouched.
                    let normal = centers / distance;
                    let rel_vel = second.velocity - first.velocity;
                    let change = normal * (self.tuning.restitution * rel_vel.dot(&normal));
                    first.velocity += change;
                    second.velocity -= change;
                }
                first.registered = false;
                second.registered = false;
                self.segments[event.primary] = first;
                self.segments[other] = second;
                self.stale.insert(event.primary);
                self.stale.insert(other);
            }
        }

        // Predictions involving a redirected segment are invalid now that
        // its velocity changed; one compaction pass drops them all.
        let stale = &self.stale;
        self.queue
            .retain(|queued| !stale.iter().any(|&index| queued.involves(index)));
    }

    /// Computes outgoing collision candidates for every segment not yet
    /// registered and pushes them into the queue.
    fn collect_events(&mut self) {
        let radius = self.table.ball_radius;
        let rewind = self.tuning.rewind_margin;

        for i in 0..self.segments.len() {
            if self.segments[i].registered {
                continue;
            }
            let segment = self.segments[i];

            if let Some(t) =
                segment.time_of_wall_collision(Axis::X, self.table.half_width, radius, rewind)
            {
                self.queue.push(CollisionEvent::wall_x(i), t);
            }
            if let Some(t) =
                segment.time_of_wall_collision(Axis::Y, self.table.half_height, radius, rewind)
            {
                self.queue.push(CollisionEvent::wall_y(i), t);
            }

            // Pair only against already-registered segments; this one
            // becomes registered at the end of the pass, so each pair is
            // counted once.
            for j in 0..self.segments.len() {
                if i == j || !self.segments[j].registered || !self.balls[j].is_active() {
                    continue;
                }
                if let Some(t) = segment.time_of_collision_with(&self.segments[j], radius, rewind)
                {
                    self.queue.push(CollisionEvent::ball_ball(i, j), t);
                }
            }

            self.segments[i].registered = true;
        }
    }
}
