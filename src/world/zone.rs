//! Target zones: regions of the arena that hosts use to pick goal points
//! and detect zone entry
//!
//! The planning core itself only ever sees goal points; zones are the
//! collaborator-side vocabulary for choosing them.

use crate::common::Point2D;

/// Which way an open semicircle faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemiCircleDirection {
    Left,
    Right,
    Up,
    Down,
}

/// A target region with a uniform containment test
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    Circle {
        center: Point2D,
        radius: f64,
    },
    Rectangle {
        center: Point2D,
        width: f64,
        height: f64,
    },
    /// Rhombus with axis-aligned diagonals
    Diamond {
        center: Point2D,
        width: f64,
        height: f64,
    },
    SemiCircle {
        center: Point2D,
        radius: f64,
        direction: SemiCircleDirection,
    },
}

impl Zone {
    pub fn center(&self) -> Point2D {
        match *self {
            Zone::Circle { center, .. } => center,
            Zone::Rectangle { center, .. } => center,
            Zone::Diamond { center, .. } => center,
            Zone::SemiCircle { center, .. } => center,
        }
    }

    pub fn contains(&self, point: &Point2D) -> bool {
        match *self {
            Zone::Circle { center, radius } => center.distance(point) <= radius,
            Zone::Rectangle { center, width, height } => {
                (point.x - center.x).abs() <= width / 2.0
                    && (point.y - center.y).abs() <= height / 2.0
            }
            Zone::Diamond { center, width, height } => {
                let dx = (point.x - center.x).abs() / (width / 2.0);
                let dy = (point.y - center.y).abs() / (height / 2.0);
                dx + dy <= 1.0
            }
            Zone::SemiCircle { center, radius, direction } => {
                if center.distance(point) > radius {
                    return false;
                }
                match direction {
                    SemiCircleDirection::Right => point.x >= center.x,
                    SemiCircleDirection::Left => point.x <= center.x,
                    SemiCircleDirection::Up => point.y >= center.y,
                    SemiCircleDirection::Down => point.y <= center.y,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_zone() {
        let zone = Zone::Circle { center: Point2D::new(1.0, 1.0), radius: 1.5 };
        assert!(zone.contains(&Point2D::new(1.0, 2.4)));
        assert!(!zone.contains(&Point2D::new(3.0, 1.0)));
    }

    #[test]
    fn test_rectangle_zone() {
        let zone = Zone::Rectangle { center: Point2D::origin(), width: 4.0, height: 2.0 };
        assert!(zone.contains(&Point2D::new(1.9, 0.9)));
        assert!(!zone.contains(&Point2D::new(1.9, 1.1)));
    }

    #[test]
    fn test_diamond_zone() {
        let zone = Zone::Diamond { center: Point2D::origin(), width: 2.0, height: 2.0 };
        assert!(zone.contains(&Point2D::new(0.5, 0.4)));
        // a corner of the bounding box lies outside the rhombus
        assert!(!zone.contains(&Point2D::new(0.9, 0.9)));
    }

    #[test]
    fn test_semicircle_zone() {
        let zone = Zone::SemiCircle {
            center: Point2D::new(11.0, 0.0),
            radius: 2.0,
            direction: SemiCircleDirection::Left,
        };
        assert!(zone.contains(&Point2D::new(10.0, 0.5)));
        assert!(!zone.contains(&Point2D::new(11.5, 0.0)));
        assert!(!zone.contains(&Point2D::new(8.0, 0.0)));
    }
}
