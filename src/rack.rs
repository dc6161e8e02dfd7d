use nalgebra::Vector2;
use rand::Rng;
use rand_pcg::Pcg64;

use crate::config::TableConfig;

/// Standard sixteen-ball setup: the cue ball at the foot of the table and
/// the other fifteen racked in a five-row triangle. Row spacing leaves a
/// little daylight between neighbors so the break has to close it.
pub fn triangle_rack(ball_radius: f64) -> Vec<Vector2<f64>> {
    let dx = 1.2 * ball_radius;
    let dy = 1.8 * ball_radius;

    let mut positions = Vec::with_capacity(16);
    positions.push(Vector2::new(0., -10. * ball_radius));
    for row in 0..5i32 {
        let y = f64::from(row) * dy;
        let mut offset = -row;
        while offset <= row {
            positions.push(Vector2::new(f64::from(offset) * dx, y));
            offset += 2;
        }
    }
    positions
}

/// Seeded random non-overlapping placement, for stress scenarios and
/// deterministic randomized tests.
///
/// # Panics
///
/// Panics if `count` balls cannot be placed in 10000 attempts.
pub fn scatter(table: &TableConfig, count: usize, seed: u64) -> Vec<Vector2<f64>> {
    let mut rng = Pcg64::new(u128::from(seed), 0xa02bdbf7bb3c0a7ac28fa16a64abf96);
    let r = table.ball_radius;

    let mut positions = Vec::<Vector2<f64>>::with_capacity(count);
    let mut attempts = 0;
    while positions.len() < count {
        attempts += 1;
        assert!(attempts <= 10000, "table too crowded for {} balls", count);

        let candidate = Vector2::new(
            rng.gen_range((-table.half_width + r)..(table.half_width - r)),
            rng.gen_range((-table.half_height + r)..(table.half_height - r)),
        );

        // Check it doesn't overlap with an existing ball.
        if positions
            .iter()
            .any(|other| (other - candidate).norm() <= 2. * r)
        {
            continue;
        }
        positions.push(candidate);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;

    fn pairwise_separated(positions: &[Vector2<f64>], min_distance: f64) -> bool {
        positions.iter().enumerate().all(|(i, a)| {
            positions[i + 1..]
                .iter()
                .all(|b| (a - b).norm() > min_distance)
        })
    }

    #[test]
    fn triangle_rack_has_sixteen_separated_balls() {
        let positions = triangle_rack(3.);
        assert_eq!(positions.len(), 16);
        assert!(pairwise_separated(&positions, 6.));
        // Cue ball sits alone at the foot.
        assert_eq!(positions[0], Vector2::new(0., -30.));
    }

    #[test]
    fn rack_fits_the_default_table() {
        let table = TableConfig::default();
        for p in triangle_rack(table.ball_radius) {
            assert!(p.x.abs() <= table.half_width - table.ball_radius);
            assert!(p.y.abs() <= table.half_height - table.ball_radius);
        }
    }

    #[test]
    fn scatter_is_deterministic_and_separated() {
        let table = TableConfig::default();
        let a = scatter(&table, 12, 7);
        let b = scatter(&table, 12, 7);
        assert_eq!(a, b);
        assert!(pairwise_separated(&a, 2. * table.ball_radius));
    }
}
