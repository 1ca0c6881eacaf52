//! Random scenario sweep for the ECBS coordinator
//!
//! Generates seeded random fields (clustered obstacles, scattered agents,
//! one shared goal), runs ECBS on each, and tallies the outcomes. Useful
//! as a quick robustness check: failures here are expected values, never
//! panics.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use rust_mapf::{
    AgentId, Arena, EcbsConfig, EcbsPlanner, HybridAStarConfig, HybridAStarPlanner, Obstacles,
    PlanningError, Point2D, Pose2D, PoseTable,
};

const SEED: u64 = 42;
const NUM_SCENARIOS: usize = 20;
const NUM_AGENTS: usize = 4;
const NUM_CLUSTERS: usize = 3;
const POINTS_PER_CLUSTER: usize = 8;
const SAFE_DISTANCE: f64 = 0.6;

fn random_obstacles(rng: &mut StdRng) -> Obstacles {
    let mut obstacles = Obstacles::new();
    let spread = Normal::new(0.0, 0.3).unwrap();
    for _ in 0..NUM_CLUSTERS {
        let cx = rng.gen_range(-4.0..4.0);
        let cy = rng.gen_range(-3.0..3.0);
        for _ in 0..POINTS_PER_CLUSTER {
            obstacles.push(Point2D::new(cx + spread.sample(rng), cy + spread.sample(rng)));
        }
    }
    obstacles
}

/// Scatter agents along the arena edges, far enough from the obstacles and
/// from each other that every start pose is usable
fn random_poses(rng: &mut StdRng, obstacles: &Obstacles) -> PoseTable {
    let mut table = PoseTable::new();
    let mut placed: Vec<Point2D> = Vec::new();
    for agent in 1..=NUM_AGENTS as AgentId {
        loop {
            let x = rng.gen_range(-9.0..9.0);
            let y = rng.gen_range(-5.0..5.0);
            let candidate = Point2D::new(x, y);
            if obstacles.clearance(&candidate) < 1.0 {
                continue;
            }
            if placed.iter().any(|p| p.distance(&candidate) < 1.5) {
                continue;
            }
            let yaw = rng.gen_range(-PI..PI);
            table.set(agent, Pose2D::new(x, y, yaw));
            placed.push(candidate);
            break;
        }
    }
    table
}

fn random_goal(rng: &mut StdRng, obstacles: &Obstacles) -> Point2D {
    loop {
        let goal = Point2D::new(rng.gen_range(-6.0..6.0), rng.gen_range(-4.0..4.0));
        if obstacles.clearance(&goal) >= 1.5 {
            return goal;
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!(
        "ECBS random scenario sweep: {} scenarios, {} agents each, seed {}",
        NUM_SCENARIOS, NUM_AGENTS, SEED
    );

    let mut rng = StdRng::seed_from_u64(SEED);
    let agents: Vec<AgentId> = (1..=NUM_AGENTS as AgentId).collect();

    let mut solved = 0usize;
    let mut no_solution = 0usize;
    let mut no_path = 0usize;

    for scenario in 0..NUM_SCENARIOS {
        let obstacles = random_obstacles(&mut rng);
        let table = random_poses(&mut rng, &obstacles);
        let goal = random_goal(&mut rng, &obstacles);

        let config = HybridAStarConfig {
            xy_resolution: 0.45,
            max_expansions: 10_000,
            ..Default::default()
        };
        let planner = HybridAStarPlanner::new(Arena::field(), obstacles, config);
        let ecbs = EcbsPlanner::new(
            &planner,
            EcbsConfig { safe_distance: SAFE_DISTANCE, epsilon: 1.5, max_nodes: 200 },
        )
        .unwrap();

        match ecbs.find_solution(&agents, &table, goal) {
            Ok(solution) => {
                solved += 1;
                println!(
                    "scenario {:2}: solved, cost {} (goal {:.1}, {:.1})",
                    scenario,
                    solution.total_cost(),
                    goal.x,
                    goal.y
                );
            }
            Err(PlanningError::NoSolution) => {
                no_solution += 1;
                println!("scenario {:2}: no conflict-free joint plan", scenario);
            }
            Err(e) => {
                no_path += 1;
                println!("scenario {:2}: {}", scenario, e);
            }
        }
    }

    println!(
        "done: {} solved, {} without joint plan, {} without any path",
        solved, no_solution, no_path
    );
}
