//! Animatable values
//!
//! The engine only knows five abstract properties. Whatever owns the real
//! visual surface decides what they mean on screen.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Geometry and Color
// ─────────────────────────────────────────────────────────────────────────────

/// 3-component vector used for position, scale and Euler rotation
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn lerp(self, to: Vec3, t: f32) -> Vec3 {
        Vec3 {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            z: lerp(self.z, to.z, t),
        }
    }

    fn add_scaled(self, delta: Vec3, k: f32) -> Vec3 {
        Vec3::new(self.x + delta.x * k, self.y + delta.y * k, self.z + delta.z * k)
    }

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// RGBA color (linear space)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn lerp(self, to: Color, t: f32) -> Color {
        Color {
            r: lerp(self.r, to.r, t),
            g: lerp(self.g, to.g, t),
            b: lerp(self.b, to.b, t),
            a: lerp(self.a, to.a, t),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

/// Key of an animatable property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    Position,
    Scale,
    Rotation,
    Color,
    Alpha,
}

impl Property {
    pub const ALL: [Property; 5] = [
        Property::Position,
        Property::Scale,
        Property::Rotation,
        Property::Color,
        Property::Alpha,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Property::Position => "position",
            Property::Scale => "scale",
            Property::Rotation => "rotation",
            Property::Color => "color",
            Property::Alpha => "alpha",
        }
    }
}

/// A concrete value for one property
///
/// Rotation is raw Euler degrees. Interpolation never wraps, so going from
/// 0 to 450 turns one and a quarter times.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Position(Vec3),
    Scale(Vec3),
    Rotation(Vec3),
    Color(Color),
    Alpha(f32),
}

impl PropertyValue {
    pub fn property(&self) -> Property {
        match self {
            PropertyValue::Position(_) => Property::Position,
            PropertyValue::Scale(_) => Property::Scale,
            PropertyValue::Rotation(_) => Property::Rotation,
            PropertyValue::Color(_) => Property::Color,
            PropertyValue::Alpha(_) => Property::Alpha,
        }
    }

    /// Interpolate toward `to`.
    ///
    /// Values of different properties can't be blended; the end value wins.
    pub fn lerp(&self, to: &PropertyValue, t: f32) -> PropertyValue {
        match (self, to) {
            (PropertyValue::Position(a), PropertyValue::Position(b)) => {
                PropertyValue::Position(a.lerp(*b, t))
            }
            (PropertyValue::Scale(a), PropertyValue::Scale(b)) => {
                PropertyValue::Scale(a.lerp(*b, t))
            }
            (PropertyValue::Rotation(a), PropertyValue::Rotation(b)) => {
                PropertyValue::Rotation(a.lerp(*b, t))
            }
            (PropertyValue::Color(a), PropertyValue::Color(b)) => {
                PropertyValue::Color(a.lerp(*b, t))
            }
            (PropertyValue::Alpha(a), PropertyValue::Alpha(b)) => {
                PropertyValue::Alpha(lerp(*a, *b, t))
            }
            _ => *to,
        }
    }

    /// Shift this value by `k` times the span from `from` to `to`.
    ///
    /// Used by incremental loops, where every iteration starts where the
    /// previous one ended.
    pub fn offset(&self, from: &PropertyValue, to: &PropertyValue, k: f32) -> PropertyValue {
        match (self, from, to) {
            (PropertyValue::Position(v), PropertyValue::Position(a), PropertyValue::Position(b)) => {
                PropertyValue::Position(v.add_scaled(b.sub(*a), k))
            }
            (PropertyValue::Scale(v), PropertyValue::Scale(a), PropertyValue::Scale(b)) => {
                PropertyValue::Scale(v.add_scaled(b.sub(*a), k))
            }
            (PropertyValue::Rotation(v), PropertyValue::Rotation(a), PropertyValue::Rotation(b)) => {
                PropertyValue::Rotation(v.add_scaled(b.sub(*a), k))
            }
            (PropertyValue::Color(v), PropertyValue::Color(a), PropertyValue::Color(b)) => {
                PropertyValue::Color(Color {
                    r: v.r + (b.r - a.r) * k,
                    g: v.g + (b.g - a.g) * k,
                    b: v.b + (b.b - a.b) * k,
                    a: v.a + (b.a - a.a) * k,
                })
            }
            (PropertyValue::Alpha(v), PropertyValue::Alpha(a), PropertyValue::Alpha(b)) => {
                PropertyValue::Alpha(v + (b - a) * k)
            }
            _ => *self,
        }
    }
}
