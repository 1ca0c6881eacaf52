//! Common types used throughout rust_mapf

use nalgebra::{Vector2, Vector3};

/// Identifier of one mobile agent in a coordination run
pub type AgentId = u32;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// 2D pose (position + orientation), yaw in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, yaw: 0.0 }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.yaw)
    }

    /// Normalize yaw to [-pi, pi]
    pub fn normalize_yaw(&mut self) {
        while self.yaw > std::f64::consts::PI {
            self.yaw -= 2.0 * std::f64::consts::PI;
        }
        while self.yaw < -std::f64::consts::PI {
            self.yaw += 2.0 * std::f64::consts::PI;
        }
    }
}

impl From<Vector3<f64>> for Pose2D {
    fn from(v: Vector3<f64>) -> Self {
        Self { x: v[0], y: v[1], yaw: v[2] }
    }
}

/// Time-indexed sequence of poses produced by the low-level planner
///
/// The index is the discrete timestep: element 0 is the start pose, the last
/// element is the pose at which the goal point was reached. An agent that has
/// finished its path is treated as parked at the final pose for all later
/// timesteps.
#[derive(Debug, Clone, PartialEq)]
pub struct PosePath {
    pub poses: Vec<Pose2D>,
}

impl PosePath {
    pub fn new() -> Self {
        Self { poses: Vec::new() }
    }

    pub fn from_poses(poses: Vec<Pose2D>) -> Self {
        Self { poses }
    }

    pub fn push(&mut self, pose: Pose2D) {
        self.poses.push(pose);
    }

    /// Number of poses; also the path's contribution to a solution cost
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn first(&self) -> Option<&Pose2D> {
        self.poses.first()
    }

    pub fn last(&self) -> Option<&Pose2D> {
        self.poses.last()
    }

    /// Position at a timestep, with parked-at-end semantics
    ///
    /// Panics on an empty path; the planner never emits one.
    pub fn position_at(&self, timestep: usize) -> Point2D {
        let index = timestep.min(self.poses.len() - 1);
        self.poses[index].position()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.poses.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.poses.iter().map(|p| p.y).collect()
    }
}

impl Default for PosePath {
    fn default() -> Self {
        Self::new()
    }
}

/// Static point obstacles, shared read-only across agents
#[derive(Debug, Clone)]
pub struct Obstacles {
    pub points: Vec<Point2D>,
}

impl Obstacles {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn from_xy(x: &[f64], y: &[f64]) -> Self {
        assert_eq!(x.len(), y.len());
        let points = x.iter().zip(y.iter())
            .map(|(&x, &y)| Point2D::new(x, y))
            .collect();
        Self { points }
    }

    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distance from a point to the nearest obstacle, or infinity if none
    pub fn clearance(&self, point: &Point2D) -> f64 {
        self.points
            .iter()
            .map(|o| o.distance(point))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }
}

impl Default for Obstacles {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_point2d_midpoint() {
        let m = Point2D::new(0.0, 2.0).midpoint(&Point2D::new(2.0, 0.0));
        assert!((m.x - 1.0).abs() < 1e-10);
        assert!((m.y - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_pose2d_normalize_yaw() {
        let mut pose = Pose2D::new(0.0, 0.0, 4.0);
        pose.normalize_yaw();
        assert!(pose.yaw >= -std::f64::consts::PI && pose.yaw <= std::f64::consts::PI);
    }

    #[test]
    fn test_pose_path_parked_at_end() {
        let path = PosePath::from_poses(vec![
            Pose2D::new(0.0, 0.0, 0.0),
            Pose2D::new(0.5, 0.0, 0.0),
        ]);
        assert_eq!(path.position_at(0), Point2D::new(0.0, 0.0));
        assert_eq!(path.position_at(1), Point2D::new(0.5, 0.0));
        // beyond the end the agent stays parked at the final pose
        assert_eq!(path.position_at(100), Point2D::new(0.5, 0.0));
    }

    #[test]
    fn test_obstacles_clearance() {
        let obstacles = Obstacles::from_xy(&[1.0, 3.0], &[0.0, 0.0]);
        let c = obstacles.clearance(&Point2D::new(0.0, 0.0));
        assert!((c - 1.0).abs() < 1e-10);
        assert_eq!(Obstacles::new().clearance(&Point2D::origin()), f64::INFINITY);
    }
}
