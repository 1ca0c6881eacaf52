//! Visualization utilities for rust_mapf
//!
//! Provides a unified interface for plotting multi-agent planning results
//! using gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{AgentId, Obstacles, Point2D, Pose2D, PosePath};
use crate::coordination::Solution;
use crate::world::Arena;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const ORANGE: &str = "#FFA500";
    pub const PURPLE: &str = "#800080";
    pub const CYAN: &str = "#00FFFF";
    pub const MAGENTA: &str = "#FF00FF";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;

    /// Per-agent path colors, cycled by agent index
    pub const AGENTS: [&str; 6] = [RED, BLUE, ORANGE, PURPLE, CYAN, MAGENTA];
}

/// Path color for the i-th agent of a run
pub fn agent_color(index: usize) -> &'static str {
    colors::AGENTS[index % colors::AGENTS.len()]
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
}

impl Visualizer {
    /// Create a new visualizer
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            x_label: "X [m]".to_string(),
            y_label: "Y [m]".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
        }
    }

    /// Set the plot title
    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Clamp the axes to the arena extents
    pub fn set_arena(&mut self, arena: &Arena) -> &mut Self {
        self.x_range = Some((arena.min.x, arena.max.x));
        self.y_range = Some((arena.min.y, arena.max.y));
        self
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Get mutable reference to the internal figure for advanced usage
    pub fn figure_mut(&mut self) -> &mut Figure {
        &mut self.figure
    }

    /// Plot one agent's path
    pub fn plot_path(&mut self, path: &PosePath, style: &PathStyle) -> &mut Self {
        let x = path.x_coords();
        let y = path.y_coords();

        self.figure.axes2d().lines(
            &x,
            &y,
            &[
                Caption(&style.caption),
                Color(&style.color),
                LineWidth(style.line_width),
            ],
        );
        self
    }

    /// Plot every path of a joint solution, colored per agent
    ///
    /// Agents are drawn in the order of the `agents` slice so colors are
    /// stable across runs.
    pub fn plot_solution(&mut self, agents: &[AgentId], solution: &Solution) -> &mut Self {
        for (index, &agent) in agents.iter().enumerate() {
            if let Some(path) = solution.path(agent) {
                let style = PathStyle::new(agent_color(index), &format!("Agent {}", agent));
                self.plot_path(path, &style);
                if let Some(start) = path.first() {
                    self.plot_agent_pose(start, 1.2);
                }
            }
        }
        self
    }

    /// Plot obstacles
    pub fn plot_obstacles(&mut self, obstacles: &Obstacles) -> &mut Self {
        let x = obstacles.x_coords();
        let y = obstacles.y_coords();

        self.figure.axes2d().points(
            &x,
            &y,
            &[
                Caption("Obstacles"),
                Color(colors::OBSTACLE),
                PointSymbol('S'),
                PointSize(0.5),
            ],
        );
        self
    }

    /// Plot a single point (start, goal, etc.)
    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.figure.axes2d().points(
            &[point.x],
            &[point.y],
            &[
                Caption(&style.caption),
                Color(&style.color),
                PointSymbol(style.symbol),
                PointSize(style.size),
            ],
        );
        self
    }

    /// Plot an agent pose with a heading indicator
    pub fn plot_agent_pose(&mut self, pose: &Pose2D, size: f64) -> &mut Self {
        self.figure.axes2d().points(
            &[pose.x],
            &[pose.y],
            &[Color(colors::GRAY), PointSymbol('O'), PointSize(size)],
        );

        // heading line (arrow substitute)
        let arrow_len = size * 0.5;
        let end_x = pose.x + arrow_len * pose.yaw.cos();
        let end_y = pose.y + arrow_len * pose.yaw.sin();

        self.figure.axes2d().lines(
            &[pose.x, end_x],
            &[pose.y, end_y],
            &[Color(colors::GRAY), LineWidth(2.0)],
        );
        self
    }

    /// Plot the shared goal point
    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::GOAL, "Goal").with_size(1.5))
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> Result<(), String> {
        self.apply_settings();
        self.figure.show().map_err(|e| e.to_string()).map(|_| ())
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> Result<(), String> {
        self.apply_settings();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| e.to_string())
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
