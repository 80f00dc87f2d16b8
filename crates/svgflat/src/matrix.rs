//! Affine transforms parsed from the SVG `transform` attribute.

use crate::{Error, Result};
use svgtypes::{TransformListParser, TransformListToken};

/// 2D affine transform.
///
/// Column-vector convention:
///
/// ```text
/// [a c e]   [x]
/// [b d f] * [y]
/// [0 0 1]   [1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Rotation around the origin, `angle` in degrees per the SVG grammar.
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn skew_x(angle: f64) -> Self {
        Self {
            c: angle.to_radians().tan(),
            ..Self::IDENTITY
        }
    }

    pub fn skew_y(angle: f64) -> Self {
        Self {
            b: angle.to_radians().tan(),
            ..Self::IDENTITY
        }
    }

    /// `self * other`: `other` is applied to the point first.
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Maps an absolute point.
    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Maps a relative offset: the linear part only, no translation.
    pub fn map_delta(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.a + y * self.c, x * self.b + y * self.d)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Parses a `transform` attribute value, composing the primitives
    /// left-to-right per the SVG transform-list grammar.
    pub fn parse(text: &str) -> Result<Self> {
        let mut matrix = Self::IDENTITY;
        for token in TransformListParser::from(text) {
            let token = token.map_err(|err| Error::Transform {
                value: text.to_string(),
                message: err.to_string(),
            })?;
            let step = match token {
                TransformListToken::Matrix { a, b, c, d, e, f } => Self { a, b, c, d, e, f },
                TransformListToken::Translate { tx, ty } => Self::translate(tx, ty),
                TransformListToken::Scale { sx, sy } => Self::scale(sx, sy),
                TransformListToken::Rotate { angle } => Self::rotate(angle),
                TransformListToken::SkewX { angle } => Self::skew_x(angle),
                TransformListToken::SkewY { angle } => Self::skew_y(angle),
            };
            matrix = matrix.multiply(&step);
        }
        Ok(matrix)
    }
}
