//! Multi-agent coordination demo
//!
//! Three agents converge on one goal point behind a wall of obstacles.
//! CBS and ECBS each produce a conflict-free joint plan; both results are
//! rendered to PNG and their costs printed for comparison.

use std::f64::consts::PI;

use rust_mapf::utils::Visualizer;
use rust_mapf::{
    AgentId, Arena, CbsConfig, CbsPlanner, EcbsConfig, EcbsPlanner, HybridAStarConfig,
    HybridAStarPlanner, Obstacles, Point2D, Pose2D, PoseTable, Solution,
};

const SAFE_DISTANCE: f64 = 0.6;
const EPSILON: f64 = 1.5;

fn min_separation(agents: &[AgentId], solution: &Solution) -> f64 {
    let horizon = agents
        .iter()
        .map(|a| solution.path(*a).unwrap().len())
        .max()
        .unwrap();
    let mut min = f64::INFINITY;
    for t in 0..horizon {
        for (i, &a) in agents.iter().enumerate() {
            for &b in &agents[i + 1..] {
                let d = solution
                    .path(a)
                    .unwrap()
                    .position_at(t)
                    .distance(&solution.path(b).unwrap().position_at(t));
                min = min.min(d);
            }
        }
    }
    min
}

fn report(label: &str, agents: &[AgentId], solution: &Solution) {
    println!(
        "{}: cost {}, min separation {:.2} m",
        label,
        solution.total_cost(),
        min_separation(agents, solution)
    );
    for &agent in agents {
        println!("  agent {}: {} poses", agent, solution.path(agent).unwrap().len());
    }
}

fn render(
    label: &str,
    file: &str,
    arena: &Arena,
    obstacles: &Obstacles,
    goal: Point2D,
    agents: &[AgentId],
    solution: &Solution,
) {
    let mut vis = Visualizer::new();
    vis.set_title(label)
        .set_arena(arena)
        .plot_obstacles(obstacles)
        .plot_goal(goal)
        .plot_solution(agents, solution);
    match vis.save_png(file, 800, 600) {
        Ok(()) => println!("  saved {}", file),
        Err(e) => eprintln!("  failed to save {}: {}", file, e),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Multi-agent planning demo");

    let arena = Arena::field();

    // wall between the left-hand agent and the goal
    let mut obstacles = Obstacles::new();
    for i in 0..11 {
        obstacles.push(Point2D::new(2.0, -3.0 + 0.4 * i as f64));
    }

    let config = HybridAStarConfig {
        xy_resolution: 0.45,
        max_expansions: 20_000,
        ..Default::default()
    };
    let planner = HybridAStarPlanner::new(arena, obstacles.clone(), config);

    let agents: Vec<AgentId> = vec![1, 2, 3];
    let mut table = PoseTable::new();
    table.set(1, Pose2D::new(-2.0, 0.0, 0.0));
    table.set(2, Pose2D::new(6.0, 1.0, PI));
    table.set(3, Pose2D::new(6.0, -1.0, PI));
    let goal = Point2D::new(4.0, 2.0);

    println!(
        "{} agents, goal ({}, {}), safe distance {} m",
        agents.len(),
        goal.x,
        goal.y,
        SAFE_DISTANCE
    );

    let cbs = CbsPlanner::new(
        &planner,
        CbsConfig { safe_distance: SAFE_DISTANCE, max_nodes: 5_000 },
    );
    match cbs.find_solution(&agents, &table, goal) {
        Ok(solution) => {
            report("CBS", &agents, &solution);
            render("CBS", "multi_agent_cbs.png", &arena, &obstacles, goal, &agents, &solution);
        }
        Err(e) => println!("CBS failed: {}", e),
    }

    let ecbs = EcbsPlanner::new(
        &planner,
        EcbsConfig { safe_distance: SAFE_DISTANCE, epsilon: EPSILON, max_nodes: 5_000 },
    )
    .unwrap();
    match ecbs.find_solution(&agents, &table, goal) {
        Ok(solution) => {
            report("ECBS", &agents, &solution);
            render("ECBS", "multi_agent_ecbs.png", &arena, &obstacles, goal, &agents, &solution);
        }
        Err(e) => println!("ECBS failed: {}", e),
    }
}
