//! Integer grid geometry: locations, movement deltas, and rectangles.
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Immutable 2D integer coordinate.
///
/// Used both for absolute grid locations and for relative movement deltas.
/// `y` grows downward, matching row-major tile storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const NORTH: Self = Self { x: 0, y: -1 };
    pub const NORTH_EAST: Self = Self { x: 1, y: -1 };
    pub const EAST: Self = Self { x: 1, y: 0 };
    pub const SOUTH_EAST: Self = Self { x: 1, y: 1 };
    pub const SOUTH: Self = Self { x: 0, y: 1 };
    pub const SOUTH_WEST: Self = Self { x: -1, y: 1 };
    pub const WEST: Self = Self { x: -1, y: 0 };
    pub const NORTH_WEST: Self = Self { x: -1, y: -1 };

    /// The eight unit steps an actor can take.
    pub const DIRECTIONS: [Self; 8] = [
        Self::NORTH,
        Self::NORTH_EAST,
        Self::EAST,
        Self::SOUTH_EAST,
        Self::SOUTH,
        Self::SOUTH_WEST,
        Self::WEST,
        Self::NORTH_WEST,
    ];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev length of this vector: `max(|x|, |y|)`.
    pub fn distance(self) -> i32 {
        self.x.abs().max(self.y.abs())
    }

    /// Chebyshev distance between two locations.
    pub fn distance_to(self, other: Self) -> i32 {
        (other - self).distance()
    }

    /// Clamps each axis independently to `{-1, 0, 1}`.
    pub fn unit(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    /// Single step that moves `self` toward `target`.
    pub fn step_toward(self, target: Self) -> Self {
        (target - self).unit()
    }

    /// Squared Euclidean length, used for radius checks.
    pub fn length_squared(self) -> i64 {
        let x = i64::from(self.x);
        let y = i64::from(self.y);
        x * x + y * y
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl From<(i32, i32)> for Vector {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Vector x:{}, y:{}>", self.x, self.y)
    }
}

/// Axis-aligned rectangle described by its top-left corner and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    top_left: Vector,
    size: Vector,
}

impl Rect {
    pub const fn new(top_left: Vector, size: Vector) -> Self {
        Self { top_left, size }
    }

    pub fn from_dimensions(width: i32, height: i32) -> Self {
        Self::new(Vector::ZERO, Vector::new(width, height))
    }

    pub fn top_left(&self) -> Vector {
        self.top_left
    }

    /// Last cell inside the rectangle (inclusive corner).
    pub fn bottom_right(&self) -> Vector {
        self.top_left + self.size + Vector::new(-1, -1)
    }

    pub fn top_right(&self) -> Vector {
        Vector::new(self.bottom_right().x, self.top_left.y)
    }

    pub fn bottom_left(&self) -> Vector {
        Vector::new(self.top_left.x, self.bottom_right().y)
    }

    pub fn size(&self) -> Vector {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn area(&self) -> usize {
        (self.width().max(0) as usize) * (self.height().max(0) as usize)
    }

    pub fn center(&self) -> Vector {
        self.top_left + Vector::new(self.size.x / 2, self.size.y / 2)
    }

    pub fn contains(&self, point: Vector) -> bool {
        let bottom_right = self.bottom_right();
        point.x >= self.top_left.x
            && point.y >= self.top_left.y
            && point.x <= bottom_right.x
            && point.y <= bottom_right.y
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Vector> + use<> {
        let top_left = self.top_left;
        let (width, height) = (self.size.x.max(0), self.size.y.max(0));
        (0..height).flat_map(move |dy| {
            (0..width).map(move |dx| Vector::new(top_left.x + dx, top_left.y + dy))
        })
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Rect top_left:{}, bottom_right:{}, size:{}>",
            self.top_left,
            self.bottom_right(),
            self.size
        )
    }
}
