//! Basic demonstration of the Tank Battlegrounds simulation.
//!
//! Run with: cargo run --example basic_demo
//! Set `LOG_FORMAT=json` for JSON logs and `RUST_LOG=tanks_sim=debug` to see
//! every shot.

use tanks_sim::{EventLog, PlayerIntent, Position, SimEvent, SimWorld};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn main() {
    init_tracing();
    println!("=== Tank Battlegrounds - Simulation Demo ===\n");

    let mut sim = SimWorld::new();
    let level = concat!(env!("CARGO_MANIFEST_DIR"), "/levels/arena.json");
    if let Err(err) = sim.load_level_file(level) {
        eprintln!("failed to load {level}: {err}");
        return;
    }
    let log = EventLog::new();
    sim.add_observer(log.clone());

    println!("Initial state:");
    print_snapshot(&sim);

    // Drive right along the top corridor, then hold and shoot at the nearest enemy.
    for epoch in 0..400 {
        let intent = scripted_intent(&sim, epoch);
        let state = match sim.step(&intent) {
            Ok(state) => state,
            Err(err) => {
                eprintln!("step failed: {err}");
                return;
            }
        };

        for event in log.drain() {
            match event {
                SimEvent::ProjectileFired(unit) => {
                    println!("  [epoch {}] tank {} fired", sim.epoch(), unit.id.0)
                }
                SimEvent::UnitDestroyed(unit) => println!(
                    "  [epoch {}] tank {} destroyed at ({:.0}, {:.0})",
                    sim.epoch(),
                    unit.id.0,
                    unit.position.x,
                    unit.position.y
                ),
            }
        }

        if (epoch + 1) % 100 == 0 {
            println!("--- Epoch {} ---", sim.epoch());
            print_snapshot(&sim);
        }
        if state.is_over() {
            println!("\nMatch over after {} epochs: {:?}", sim.epoch(), state);
            break;
        }
    }

    println!("\n=== Final State (JSON) ===\n");
    match sim.snapshot().to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("snapshot serialization failed: {err}"),
    }
}

fn scripted_intent(sim: &SimWorld, epoch: u32) -> PlayerIntent {
    let snapshot = sim.snapshot();
    let Some(player) = snapshot.player() else {
        return PlayerIntent::new();
    };
    let here = Position::new(player.x, player.y);
    let nearest = snapshot
        .units
        .iter()
        .filter(|unit| !unit.is_player && unit.alive)
        .map(|unit| Position::new(unit.x, unit.y))
        .min_by(|a, b| here.distance_to(a).total_cmp(&here.distance_to(b)));

    let mut intent = PlayerIntent::new();
    if epoch < 6 && epoch % 2 == 0 {
        intent = intent.moving(1.0, 0.0);
    }
    if let Some(target) = nearest {
        intent = intent.aiming_at(target);
        if here.distance_to(&target) <= sim.config().projectile_range {
            intent = intent.firing();
        }
    }
    intent
}

fn print_snapshot(sim: &SimWorld) {
    let snapshot = sim.snapshot();
    for unit in &snapshot.units {
        println!(
            "    Tank {}{}: pos=({:.0}, {:.0}) facing={:.0} {}",
            unit.id,
            if unit.is_player { " (player)" } else { "" },
            unit.x,
            unit.y,
            unit.orientation,
            if unit.alive { "alive" } else { "destroyed" }
        );
    }
    println!("    Projectiles in flight: {}", snapshot.projectiles.len());
}
