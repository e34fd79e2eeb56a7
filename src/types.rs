//! Shared geometry types

/// Top-left window coordinate in screen space (logical points)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset by a delta
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::ops::Sub for Position {
    type Output = Delta;

    fn sub(self, rhs: Self) -> Delta {
        Delta::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Incremental pointer movement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delta {
    pub dx: f32,
    pub dy: f32,
}

impl Delta {
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Window size (logical points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<Dimensions> for egui::Vec2 {
    fn from(d: Dimensions) -> Self {
        egui::vec2(d.width, d.height)
    }
}

impl From<Position> for egui::Pos2 {
    fn from(p: Position) -> Self {
        egui::pos2(p.x, p.y)
    }
}

impl From<egui::Pos2> for Position {
    fn from(p: egui::Pos2) -> Self {
        Self::new(p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_sub_yields_delta() {
        let d = Position::new(15.0, 7.0) - Position::new(10.0, 9.0);
        assert_eq!(d, Delta::new(5.0, -2.0));
        assert!(!d.is_zero());
    }

    #[test]
    fn test_position_offset() {
        assert_eq!(Position::new(1.0, 2.0).offset(3.0, -4.0), Position::new(4.0, -2.0));
    }
}
