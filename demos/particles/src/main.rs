//! particles — smallest end-to-end demo for the soa columnar table.
//!
//! Spawns a cloud of particles in a box, integrates them column-by-column
//! with Rayon, and despawns/respawns particles whose lifetime runs out or
//! that leave the box.  Tracked particles are followed by `RowId` across the
//! swap-erase moves.
//!
//! Usage: `particles [config.json]`, where the optional file holds a
//! `TableConfig`, e.g. `{ "initial_capacity": 65536, "growth_factor": 2 }`.
//! Set `RUST_LOG=soa_table=trace` to see every table growth.

use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use soa_table::{RowId, Table, TableBuilder, TableConfig};

// ── Constants ─────────────────────────────────────────────────────────────────

const PARTICLE_COUNT: usize = 50_000;
const STEPS:          u32   = 200;
const SEED:           u64   = 42;
const HALF_EXTENT:    f32   = 100.0;
const DT:             f32   = 0.1;
const MAX_TTL:        u32   = 150;
const TRACKED:        usize = 8;
const REPORT_EVERY:   u32   = 50;

// ── Row shape ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}

/// Position, velocity, remaining lifetime in steps.
type Particle = (Position, Velocity, u32);

fn random_particle(rng: &mut SmallRng) -> Particle {
    (
        Position {
            x: rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
            y: rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
        },
        Velocity {
            dx: rng.gen_range(-5.0..5.0),
            dy: rng.gen_range(-5.0..5.0),
        },
        rng.gen_range(1..=MAX_TTL),
    )
}

fn load_config() -> Result<TableConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(TableConfig {
            initial_capacity: PARTICLE_COUNT,
            ..TableConfig::default()
        });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

// ── Simulation step ───────────────────────────────────────────────────────────

/// Advance every particle by one step.  Each column is a separate slice, so
/// positions and lifetimes are written in parallel without touching any
/// other column.
fn integrate(particles: &mut Table<Particle>) {
    let (pos, vel, ttl) = particles.columns_mut();
    pos.par_iter_mut().zip(vel.par_iter()).for_each(|(p, v)| {
        p.x += v.dx * DT;
        p.y += v.dy * DT;
    });
    ttl.par_iter_mut().for_each(|t| *t = t.saturating_sub(1));
}

/// Remove expired or escaped particles, returning how many went.
fn despawn(particles: &mut Table<Particle>) -> usize {
    let dead: Vec<RowId> = particles
        .iter()
        .filter(|row| {
            let (p, _, ttl) = row.get();
            *ttl == 0 || p.x.abs() > HALF_EXTENT || p.y.abs() > HALF_EXTENT
        })
        .map(|row| row.id())
        .collect();

    for &id in &dead {
        particles.remove(id);
    }
    dead.len()
}

fn mean_speed(particles: &Table<Particle>) -> f32 {
    if particles.is_empty() {
        return 0.0;
    }
    let total: f32 = particles
        .column::<1>()
        .par_iter()
        .map(|v| (v.dx * v.dx + v.dy * v.dy).sqrt())
        .sum();
    total / particles.len() as f32
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== particles — soa columnar table demo ===");
    println!("Particles: {PARTICLE_COUNT}  |  Steps: {STEPS}  |  Seed: {SEED}");
    println!();

    // 1. Build the table.
    let config = load_config()?;
    let mut particles: Table<Particle> = TableBuilder::from_config(config).build()?;
    info!(capacity = particles.capacity(), "table ready");

    // 2. Spawn.
    let mut rng = SmallRng::seed_from_u64(SEED);
    particles.extend((0..PARTICLE_COUNT).map(|_| random_particle(&mut rng)));
    let tracked: Vec<RowId> = particles.ids()[..TRACKED].to_vec();
    println!(
        "Spawned {} particles (capacity {})",
        particles.len(),
        particles.capacity()
    );

    // 3. Run.
    let t0 = Instant::now();
    let mut despawned = 0;
    for step in 1..=STEPS {
        integrate(&mut particles);
        let gone = despawn(&mut particles);
        despawned += gone;
        for _ in 0..gone {
            particles.emplace_row(random_particle(&mut rng));
        }

        if step % REPORT_EVERY == 0 {
            println!(
                "step {step:>4}: {:>6} live  {:>6} despawned  mean speed {:.3}",
                particles.len(),
                despawned,
                mean_speed(&particles)
            );
        }
    }
    let elapsed = t0.elapsed();

    // 4. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!(
        "  rows {}  capacity {}  despawned {}",
        particles.len(),
        particles.capacity(),
        despawned
    );
    println!();

    // 5. Tracked particles.
    println!("{:<14} {:<8} {:>10} {:>10}", "Id", "Alive", "x", "y");
    println!("{}", "-".repeat(45));
    for id in tracked {
        match particles.get(id) {
            Some(row) => {
                let p = row.field::<0>();
                println!("{:<14} {:<8} {:>10.2} {:>10.2}", id.to_string(), "yes", p.x, p.y);
            }
            None => println!("{:<14} {:<8} {:>10} {:>10}", id.to_string(), "no", "-", "-"),
        }
    }

    Ok(())
}
