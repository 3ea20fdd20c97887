use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// 2D vector for positions, velocities and directions (world units, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };
    /// Heading of a rotation of 0 degrees: screen up.
    pub const UP: Vector2 = Vector2 { x: 0.0, y: -1.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector for `degrees`, measured clockwise on screen from [`Vector2::UP`].
    #[inline]
    pub fn from_heading(degrees: f64) -> Self {
        Self::UP.rotate(degrees)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Zero-length input yields [`Vector2::ZERO`]; callers that need a
    /// direction must check for that.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Rotate by `degrees`. With y pointing down a positive angle turns clockwise on screen.
    pub fn rotate(&self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    #[inline]
    pub fn distance(&self, other: Vector2) -> f64 {
        (*self - other).length()
    }

    #[inline]
    pub fn scale(&self, factor: f64) -> Self {
        *self * factor
    }

    /// Angle in degrees of this vector in the same convention as [`Vector2::from_heading`].
    pub fn heading(&self) -> f64 {
        self.x.atan2(-self.y).to_degrees()
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f64> for Vector2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

/// Playfield extent. Positions live in `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Teleport each axis to the opposite edge once it leaves the playfield.
pub fn wrap(position: &mut Vector2, bounds: Bounds) {
    if position.x < 0.0 {
        position.x = bounds.width;
    } else if position.x > bounds.width {
        position.x = 0.0;
    }

    if position.y < 0.0 {
        position.y = bounds.height;
    } else if position.y > bounds.height {
        position.y = 0.0;
    }
}

/// Anything that collides as a circle.
pub trait CircleBody {
    fn position(&self) -> Vector2;
    fn radius(&self) -> f64;
}

/// Boundary-inclusive circle overlap.
pub fn colliding<A: CircleBody + ?Sized, B: CircleBody + ?Sized>(a: &A, b: &B) -> bool {
    a.position().distance(b.position()) <= a.radius() + b.radius()
}
