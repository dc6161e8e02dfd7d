use carom::{rack, CollisionEngine, TableConfig, TuningConfig};
use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use nalgebra::Vector2;

fn init_logging() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .expect("logging configuration");
    log4rs::init_config(config).expect("logging init");
}

/// Four corner pockets plus the two side pockets on the long rails.
fn pocket_points(table: &TableConfig) -> [Vector2<f64>; 6] {
    let w = table.half_width;
    let h = table.half_height;
    [
        Vector2::new(-w, -h),
        Vector2::new(w, -h),
        Vector2::new(-w, h),
        Vector2::new(w, h),
        Vector2::new(-w, 0.),
        Vector2::new(w, 0.),
    ]
}

/// Runs a break shot to rest, with pocket capture applied as table policy
/// outside the physics core.
fn main() {
    init_logging();

    let table = TableConfig::default();
    let positions = rack::triangle_rack(table.ball_radius);
    let mut engine = CollisionEngine::new(table, TuningConfig::default(), &positions)
        .expect("valid configuration");

    // The break: the core only ever sees a velocity change on the cue
    // ball, slightly off-axis so the rack opens up.
    engine.ball_mut(0).set_velocity(Vector2::new(0.4, 14.));

    let pockets = pocket_points(&table);
    let capture_radius = 2. * table.ball_radius;

    let mut tick = 0u64;
    while !engine.all_stopped() {
        engine.advance();
        tick += 1;

        for i in 0..engine.ball_count() {
            if !engine.ball(i).is_active() {
                continue;
            }
            let position = engine.ball(i).position();
            if pockets
                .iter()
                .any(|pocket| (position - pocket).norm() <= capture_radius)
            {
                info!("ball {} pocketed on tick {}", i, tick);
                engine.ball_mut(i).set_active(false);
            }
        }
    }

    info!(
        "all balls at rest after {} ticks ({} resolve-loop overflows)",
        tick,
        engine.overflow_count()
    );
    for (i, ball) in engine.balls().iter().enumerate() {
        info!(
            "ball {:2}: position=({:7.2}, {:7.2}) active={}",
            i,
            ball.position().x,
            ball.position().y,
            ball.is_active()
        );
    }
}
