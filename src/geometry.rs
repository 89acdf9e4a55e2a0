use super::*;

/// Axis aligned rectangle in display units.
///
/// World y points up: `y` is the top edge and the rect extends down to `y - height`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect of the given size centered on `center`.
    pub fn from_center(center: Vector<Real>, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width * 0.5,
            center.y + height * 0.5,
            width,
            height,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y - self.height
    }

    pub fn center(&self) -> Vector<Real> {
        vector![self.x + self.width * 0.5, self.y - self.height * 0.5]
    }

    pub fn offset(self, by: Vector<Real>) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
            ..self
        }
    }

    /// Edges inclusive.
    pub fn contains(&self, point: Vector<Real>) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y <= self.y
            && point.y >= self.bottom()
    }
}

/// Sign of `value` as -1, 0 or 1.
pub fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
