use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    WallX,
    WallY,
    BallBall,
}

impl EventKind {
    /// Wall events outrank ball-ball events on exact time ties; the
    /// ordering between the two wall axes is arbitrary but deterministic.
    fn tie_rank(self) -> u8 {
        match self {
            EventKind::WallX => 2,
            EventKind::WallY => 1,
            EventKind::BallBall => 0,
        }
    }
}

/// A predicted impact. `secondary` is present only for ball-ball events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollisionEvent {
    pub kind: EventKind,
    pub primary: usize,
    pub secondary: Option<usize>,
}

impl CollisionEvent {
    pub fn wall_x(primary: usize) -> CollisionEvent {
        CollisionEvent {
            kind: EventKind::WallX,
            primary,
            secondary: None,
        }
    }

    pub fn wall_y(primary: usize) -> CollisionEvent {
        CollisionEvent {
            kind: EventKind::WallY,
            primary,
            secondary: None,
        }
    }

    pub fn ball_ball(primary: usize, secondary: usize) -> CollisionEvent {
        CollisionEvent {
            kind: EventKind::BallBall,
            primary,
            secondary: Some(secondary),
        }
    }

    pub fn involves(&self, index: usize) -> bool {
        self.primary == index || self.secondary == Some(index)
    }
}

/// Priorities are keyed by negated time so the max-heap pops the earliest
/// event first; the rank breaks exact-time ties deterministically.
type Priority = (OrderedFloat<f64>, u8);

/// Pending collisions for the current tick, earliest first.
///
/// Times are relative to the current resolution point within the tick,
/// so the queue is re-based every time an event is consumed.
#[derive(Default)]
pub struct EventQueue {
    queue: PriorityQueue<CollisionEvent, Priority>,
}

impl EventQueue {
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn push(&mut self, event: CollisionEvent, time: f64) {
        self.queue
            .push(event, (OrderedFloat(-time), event.kind.tie_rank()));
    }

    pub fn pop(&mut self) -> Option<(CollisionEvent, f64)> {
        self.queue.pop().map(|(event, priority)| (event, -priority.0.into_inner()))
    }

    /// Shifts every pending time to be relative to the new "now", after
    /// `elapsed` ticks were consumed by a resolved event.
    pub fn rebase(&mut self, elapsed: f64) {
        for (_, priority) in self.queue.iter_mut() {
            priority.0 = OrderedFloat(priority.0.into_inner() + elapsed);
        }
    }

    /// Drops every event whose prediction became stale.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&CollisionEvent) -> bool,
    {
        self.queue.retain(|event, _| keep(event));
    }
}
