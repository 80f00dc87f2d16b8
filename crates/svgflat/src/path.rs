//! Path-data handling: parsing, matrix application, rounding and
//! re-serialization of `d` attribute strings.
//!
//! Matrix application follows the reference `svgpath` semantics: absolute
//! coordinates get the full affine map, relative coordinates only its linear
//! part, a leading relative moveto is positioned absolutely, horizontal and
//! vertical linetos survive only when the matrix keeps them axis-aligned,
//! and elliptical arcs have their radii and x-axis rotation remapped through
//! the transformed ellipse rather than just their endpoints.

use crate::matrix::Matrix;
use crate::util::format_number;
use crate::{Error, Result};
use std::fmt;
use std::fmt::Write as _;
use svgtypes::{PathParser, PathSegment};

/// Decimal digits kept when re-serializing transformed coordinates.
pub const PRECISION: i32 = 10;

const EPSILON: f64 = 1e-10;

/// An owned path-command sequence, transient between a `d` string and its
/// transformed replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct PathData {
    segments: Vec<PathSegment>,
}

impl PathData {
    /// Parses a `d` attribute value. Malformed syntax is a hard error; no
    /// partial command sequence is ever returned.
    pub fn parse(d: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for segment in PathParser::from(d) {
            segments.push(segment.map_err(|err| Error::PathData {
                value: d.to_string(),
                message: err.to_string(),
            })?);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Applies `matrix` to every coordinate operand of every command.
    pub fn transform(&mut self, matrix: &Matrix) {
        let orientation_reversed = matrix.determinant() < 0.0;

        // Current point and subpath start, tracked in the untransformed
        // coordinate space. Needed to decide whether absolute H/V commands
        // stay axis-aligned under the matrix.
        let mut cur = (0.0_f64, 0.0_f64);
        let mut start = (0.0_f64, 0.0_f64);

        let segments = std::mem::take(&mut self.segments);
        self.segments = segments
            .into_iter()
            .enumerate()
            .map(|(index, segment)| {
                let mapped = map_segment(segment, index, matrix, cur, orientation_reversed);
                advance(&mut cur, &mut start, segment, index);
                mapped
            })
            .collect();
    }

    /// Rounds every numeric operand to `digits` decimal places.
    ///
    /// Relative endpoints are compensated for accumulated rounding error:
    /// the residual of each rounded endpoint is folded into the next
    /// relative step, so long relative chains do not drift away from the
    /// positions the unrounded path would reach. A close resets the
    /// residual to the one recorded at the contour's moveto.
    pub fn round(&mut self, digits: i32) {
        let mut contour_start_delta = (0.0_f64, 0.0_f64);
        let mut delta = (0.0_f64, 0.0_f64);

        // Folds `delta` into a relative endpoint, rounds it, and records the
        // residual for the next segment.
        let mut round_endpoint = |x: &mut f64, y: &mut f64, abs: bool, delta: &mut (f64, f64)| {
            if !abs {
                *x += delta.0;
                *y += delta.1;
            }
            delta.0 = *x - round_to(*x, digits);
            delta.1 = *y - round_to(*y, digits);
            *x = round_to(*x, digits);
            *y = round_to(*y, digits);
        };

        for segment in &mut self.segments {
            match segment {
                PathSegment::MoveTo { abs, x, y } => {
                    round_endpoint(x, y, *abs, &mut delta);
                    contour_start_delta = delta;
                }
                PathSegment::LineTo { abs, x, y }
                | PathSegment::SmoothQuadratic { abs, x, y } => {
                    round_endpoint(x, y, *abs, &mut delta);
                }
                PathSegment::HorizontalLineTo { abs, x } => {
                    if !*abs {
                        *x += delta.0;
                    }
                    delta.0 = *x - round_to(*x, digits);
                    *x = round_to(*x, digits);
                }
                PathSegment::VerticalLineTo { abs, y } => {
                    if !*abs {
                        *y += delta.1;
                    }
                    delta.1 = *y - round_to(*y, digits);
                    *y = round_to(*y, digits);
                }
                PathSegment::CurveTo {
                    abs, x1, y1, x2, y2, x, y,
                } => {
                    *x1 = round_to(*x1, digits);
                    *y1 = round_to(*y1, digits);
                    *x2 = round_to(*x2, digits);
                    *y2 = round_to(*y2, digits);
                    round_endpoint(x, y, *abs, &mut delta);
                }
                PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                    *x2 = round_to(*x2, digits);
                    *y2 = round_to(*y2, digits);
                    round_endpoint(x, y, *abs, &mut delta);
                }
                PathSegment::Quadratic { abs, x1, y1, x, y } => {
                    *x1 = round_to(*x1, digits);
                    *y1 = round_to(*y1, digits);
                    round_endpoint(x, y, *abs, &mut delta);
                }
                PathSegment::EllipticalArc {
                    abs,
                    rx,
                    ry,
                    x_axis_rotation,
                    x,
                    y,
                    ..
                } => {
                    *rx = round_to(*rx, digits);
                    *ry = round_to(*ry, digits);
                    // Rotation is an angle, not a coordinate; keep two extra
                    // digits of it.
                    *x_axis_rotation = round_to(*x_axis_rotation, digits + 2);
                    round_endpoint(x, y, *abs, &mut delta);
                }
                PathSegment::ClosePath { .. } => delta = contour_start_delta,
            }
        }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = ryu_js::Buffer::new();
        let mut out = String::new();
        for segment in &self.segments {
            if !out.is_empty() {
                out.push(' ');
            }
            write_segment(&mut out, segment, &mut buf);
        }
        f.write_str(&out)
    }
}

fn letter(upper: char, abs: bool) -> char {
    if abs {
        upper
    } else {
        upper.to_ascii_lowercase()
    }
}

fn write_segment(out: &mut String, segment: &PathSegment, buf: &mut ryu_js::Buffer) {
    match *segment {
        PathSegment::MoveTo { abs, x, y } => write_coords(out, letter('M', abs), &[x, y], buf),
        PathSegment::LineTo { abs, x, y } => write_coords(out, letter('L', abs), &[x, y], buf),
        PathSegment::HorizontalLineTo { abs, x } => write_coords(out, letter('H', abs), &[x], buf),
        PathSegment::VerticalLineTo { abs, y } => write_coords(out, letter('V', abs), &[y], buf),
        PathSegment::CurveTo {
            abs, x1, y1, x2, y2, x, y,
        } => write_coords(out, letter('C', abs), &[x1, y1, x2, y2, x, y], buf),
        PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
            write_coords(out, letter('S', abs), &[x2, y2, x, y], buf)
        }
        PathSegment::Quadratic { abs, x1, y1, x, y } => {
            write_coords(out, letter('Q', abs), &[x1, y1, x, y], buf)
        }
        PathSegment::SmoothQuadratic { abs, x, y } => {
            write_coords(out, letter('T', abs), &[x, y], buf)
        }
        PathSegment::EllipticalArc {
            abs,
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
        } => {
            out.push(letter('A', abs));
            out.push_str(format_number(rx, buf));
            out.push(' ');
            out.push_str(format_number(ry, buf));
            out.push(' ');
            out.push_str(format_number(x_axis_rotation, buf));
            let _ = write!(out, " {} {} ", large_arc as u8, sweep as u8);
            out.push_str(format_number(x, buf));
            out.push(' ');
            out.push_str(format_number(y, buf));
        }
        PathSegment::ClosePath { abs } => out.push(letter('Z', abs)),
    }
}

fn write_coords(out: &mut String, cmd: char, values: &[f64], buf: &mut ryu_js::Buffer) {
    out.push(cmd);
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(format_number(*value, buf));
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10.0_f64.powi(digits);
    (value * factor).round() / factor
}

/// Rewrites one segment under `matrix`. `cur` is the current point before
/// this segment, in the untransformed space.
fn map_segment(
    segment: PathSegment,
    index: usize,
    matrix: &Matrix,
    cur: (f64, f64),
    orientation_reversed: bool,
) -> PathSegment {
    let map = |abs: bool, x: f64, y: f64| {
        if abs {
            matrix.map(x, y)
        } else {
            matrix.map_delta(x, y)
        }
    };

    match segment {
        PathSegment::MoveTo { abs, x, y } => {
            // The very first moveto positions the pen absolutely even when
            // written in relative form, so it picks up the translation.
            let (x, y) = map(abs || index == 0, x, y);
            PathSegment::MoveTo { abs, x, y }
        }
        PathSegment::LineTo { abs, x, y } => {
            let (x, y) = map(abs, x, y);
            PathSegment::LineTo { abs, x, y }
        }
        PathSegment::HorizontalLineTo { abs: true, x } => {
            let p = matrix.map(x, cur.1);
            if p.1 == matrix.map(cur.0, cur.1).1 {
                PathSegment::HorizontalLineTo { abs: true, x: p.0 }
            } else {
                PathSegment::LineTo {
                    abs: true,
                    x: p.0,
                    y: p.1,
                }
            }
        }
        PathSegment::HorizontalLineTo { abs: false, x } => {
            let p = matrix.map_delta(x, 0.0);
            if p.1 == 0.0 {
                PathSegment::HorizontalLineTo { abs: false, x: p.0 }
            } else {
                PathSegment::LineTo {
                    abs: false,
                    x: p.0,
                    y: p.1,
                }
            }
        }
        PathSegment::VerticalLineTo { abs: true, y } => {
            let p = matrix.map(cur.0, y);
            if p.0 == matrix.map(cur.0, cur.1).0 {
                PathSegment::VerticalLineTo { abs: true, y: p.1 }
            } else {
                PathSegment::LineTo {
                    abs: true,
                    x: p.0,
                    y: p.1,
                }
            }
        }
        PathSegment::VerticalLineTo { abs: false, y } => {
            let p = matrix.map_delta(0.0, y);
            if p.0 == 0.0 {
                PathSegment::VerticalLineTo { abs: false, y: p.1 }
            } else {
                PathSegment::LineTo {
                    abs: false,
                    x: p.0,
                    y: p.1,
                }
            }
        }
        PathSegment::CurveTo {
            abs, x1, y1, x2, y2, x, y,
        } => {
            let (x1, y1) = map(abs, x1, y1);
            let (x2, y2) = map(abs, x2, y2);
            let (x, y) = map(abs, x, y);
            PathSegment::CurveTo {
                abs, x1, y1, x2, y2, x, y,
            }
        }
        PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
            let (x2, y2) = map(abs, x2, y2);
            let (x, y) = map(abs, x, y);
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y }
        }
        PathSegment::Quadratic { abs, x1, y1, x, y } => {
            let (x1, y1) = map(abs, x1, y1);
            let (x, y) = map(abs, x, y);
            PathSegment::Quadratic { abs, x1, y1, x, y }
        }
        PathSegment::SmoothQuadratic { abs, x, y } => {
            let (x, y) = map(abs, x, y);
            PathSegment::SmoothQuadratic { abs, x, y }
        }
        PathSegment::EllipticalArc {
            abs,
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
        } => {
            let ellipse = Ellipse {
                rx,
                ry,
                ax: x_axis_rotation,
            }
            .transform(matrix);
            // A reflection swaps the drawing direction of the arc.
            let sweep = if orientation_reversed { !sweep } else { sweep };
            let (x, y) = map(abs, x, y);
            if ellipse.is_degenerate() {
                PathSegment::LineTo { abs, x, y }
            } else {
                PathSegment::EllipticalArc {
                    abs,
                    rx: ellipse.rx,
                    ry: ellipse.ry,
                    x_axis_rotation: ellipse.ax,
                    large_arc,
                    sweep,
                    x,
                    y,
                }
            }
        }
        PathSegment::ClosePath { abs } => PathSegment::ClosePath { abs },
    }
}

/// Advances the tracked current point past `segment` (original coordinates).
fn advance(cur: &mut (f64, f64), start: &mut (f64, f64), segment: PathSegment, index: usize) {
    let step = |cur: &mut (f64, f64), abs: bool, x: f64, y: f64| {
        if abs {
            *cur = (x, y);
        } else {
            cur.0 += x;
            cur.1 += y;
        }
    };

    match segment {
        PathSegment::MoveTo { abs, x, y } => {
            step(cur, abs || index == 0, x, y);
            *start = *cur;
        }
        PathSegment::LineTo { abs, x, y }
        | PathSegment::SmoothQuadratic { abs, x, y }
        | PathSegment::CurveTo { abs, x, y, .. }
        | PathSegment::SmoothCurveTo { abs, x, y, .. }
        | PathSegment::Quadratic { abs, x, y, .. }
        | PathSegment::EllipticalArc { abs, x, y, .. } => step(cur, abs, x, y),
        PathSegment::HorizontalLineTo { abs, x } => {
            if abs {
                cur.0 = x;
            } else {
                cur.0 += x;
            }
        }
        PathSegment::VerticalLineTo { abs, y } => {
            if abs {
                cur.1 = y;
            } else {
                cur.1 += y;
            }
        }
        PathSegment::ClosePath { .. } => *cur = *start,
    }
}

/// Elliptical-arc radii and x-axis rotation (degrees) remapped through an
/// affine matrix via the eigenvalues of `M·E·(M·E)ᵀ`, following the
/// reference `svgpath` ellipse math.
#[derive(Debug, Clone, Copy)]
struct Ellipse {
    rx: f64,
    ry: f64,
    ax: f64,
}

impl Ellipse {
    fn transform(self, m: &Matrix) -> Self {
        let (s0, c0) = self.ax.to_radians().sin_cos();
        let ma = [
            self.rx * (m.a * c0 + m.c * s0),
            self.rx * (m.b * c0 + m.d * s0),
            self.ry * (-m.a * s0 + m.c * c0),
            self.ry * (-m.b * s0 + m.d * c0),
        ];

        let j = ma[0] * ma[0] + ma[2] * ma[2];
        let k = ma[1] * ma[1] + ma[3] * ma[3];
        let mean = (j + k) / 2.0;

        // Discriminant of the characteristic polynomial.
        let mut d = ((ma[0] - ma[3]) * (ma[0] - ma[3]) + (ma[2] + ma[1]) * (ma[2] + ma[1]))
            * ((ma[0] + ma[3]) * (ma[0] + ma[3]) + (ma[2] - ma[1]) * (ma[2] - ma[1]));

        if d < EPSILON * mean {
            // The image is (almost) a circle.
            let r = mean.sqrt();
            return Self {
                rx: r,
                ry: r,
                ax: 0.0,
            };
        }

        let l = ma[0] * ma[1] + ma[2] * ma[3];
        d = d.sqrt();

        let l1 = mean + d / 2.0;
        let l2 = mean - d / 2.0;

        // The x-axis rotation is the argument of the l1 eigenvector.
        let ax = if l.abs() < EPSILON && (l1 - k).abs() < EPSILON {
            90.0
        } else {
            let t = if l.abs() > (l1 - k).abs() {
                (l1 - j) / l
            } else {
                l / (l1 - k)
            };
            t.atan().to_degrees()
        };

        if ax >= 0.0 {
            Self {
                rx: l1.sqrt(),
                ry: l2.sqrt(),
                ax,
            }
        } else {
            // Negative angle: exchange the axes instead.
            Self {
                rx: l2.sqrt(),
                ry: l1.sqrt(),
                ax: ax + 90.0,
            }
        }
    }

    fn is_degenerate(&self) -> bool {
        self.rx.abs() < EPSILON || self.ry.abs() < EPSILON
    }
}
