//! Grid pitch and snapping.

/// The editor's snapping grid.
///
/// Snapping always rounds *down* to a multiple of the pitch, so a node dragged
/// anywhere inside a cell lands on that cell's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub pitch: f32,
}

impl Default for Grid {
    fn default() -> Self {
        Self { pitch: 10.0 }
    }
}

impl Grid {
    pub fn new(pitch: f32) -> Self {
        Self { pitch }
    }

    /// Floor `value` to a multiple of the pitch. A non-positive pitch disables
    /// snapping.
    pub fn snap(&self, value: f32) -> f32 {
        snap_down(value, self.pitch)
    }

    pub fn snap_point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.snap(x), self.snap(y))
    }

    /// SVG path commands for the grid lines visible in a `width` x `height`
    /// screen area.
    ///
    /// `offset` is the viewport's canvas offset, so a canvas point `p` appears
    /// at `(p + offset) * zoom`. Returns an empty string when the lines would
    /// be closer than 4 screen pixels.
    pub fn commands(&self, width: f32, height: f32, zoom: f32, offset: (f32, f32)) -> String {
        let spacing = self.pitch * zoom;
        if spacing < 4.0 {
            return String::new();
        }

        let mut commands = Vec::new();
        let mut x = (offset.0 * zoom).rem_euclid(spacing);
        while x <= width {
            commands.push(format!("M {} 0 L {} {}", x, x, height));
            x += spacing;
        }
        let mut y = (offset.1 * zoom).rem_euclid(spacing);
        while y <= height {
            commands.push(format!("M 0 {} L {} {}", y, width, y));
            y += spacing;
        }
        commands.join(" ")
    }
}

/// Floor `value` to a multiple of `pitch`.
pub fn snap_down(value: f32, pitch: f32) -> f32 {
    if pitch > 0.0 {
        (value / pitch).floor() * pitch
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_down() {
        let grid = Grid::new(20.0);
        assert_eq!(grid.snap(39.9), 20.0);
        assert_eq!(grid.snap(40.0), 40.0);
        assert_eq!(grid.snap(0.0), 0.0);
    }

    #[test]
    fn test_snap_negative_values_floor_away_from_zero() {
        let grid = Grid::new(20.0);
        assert_eq!(grid.snap(-1.0), -20.0);
        assert_eq!(grid.snap(-20.0), -20.0);
    }

    #[test]
    fn test_snap_point() {
        let grid = Grid::new(10.0);
        assert_eq!(grid.snap_point(115.0, 99.0), (110.0, 90.0));
    }

    #[test]
    fn test_commands_draw_both_directions() {
        let commands = Grid::new(25.0).commands(100.0, 100.0, 1.0, (0.0, 0.0));
        assert!(commands.contains("M 0 0 L 0 100"));
        assert!(commands.contains("M 25 0 L 25 100"));
        assert!(commands.contains("M 0 25 L 100 25"));
    }

    #[test]
    fn test_commands_follow_offset() {
        let commands = Grid::new(20.0).commands(100.0, 100.0, 1.0, (5.0, 0.0));
        assert!(commands.starts_with("M 5 0 L 5 100"));
    }

    #[test]
    fn test_commands_hidden_when_too_dense() {
        // 10 * 0.3 = 3 screen pixels
        assert!(Grid::new(10.0).commands(100.0, 100.0, 0.3, (0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_zero_pitch_disables_snapping() {
        assert_eq!(snap_down(12.34, 0.0), 12.34);
        assert_eq!(Grid::new(-5.0).snap(7.5), 7.5);
    }
}
