use crate::error::Error;
use num_traits::ToPrimitive;
use ordered_float::NotNan;
use std::{
    fmt,
    ops::{Add, Mul, Sub},
    str::FromStr,
};

/// Width and height of an image or a target grid, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The `(rows, cols)` shape of an array covering this size.
    pub fn shape(self) -> (usize, usize) {
        (self.height, self.width)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || Error::ParseSize(s.to_owned());
        let (width, height) = s
            .trim()
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(parse_error)?;
        Ok(Self {
            width: width.trim().parse().map_err(|_| parse_error())?,
            height: height.trim().parse().map_err(|_| parse_error())?,
        })
    }
}

/// A point in either image or target space. Coordinates are never NaN.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Result<Self, Error> {
        Ok(Self {
            x: finite(x)?,
            y: finite(y)?,
        })
    }

    /// The center of pixel `(x, y)`.
    pub(crate) fn from_pixel(x: usize, y: usize) -> Self {
        Self {
            x: x as f32,
            y: y as f32,
        }
    }

    pub fn squared_distance(self, other: Self) -> f32 {
        let delta = other - self;
        delta.dot(delta)
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.y
    }

    /// Squared distance from `self` to the closed segment `a`-`b`.
    pub(crate) fn squared_distance_to_segment(self, a: Self, b: Self) -> f32 {
        let ab = b - a;
        let length_squared = ab.dot(ab);
        if length_squared == 0.0 {
            return self.squared_distance(a);
        }
        let t = ((self - a).dot(ab) / length_squared).clamp(0.0, 1.0);
        self.squared_distance(a + ab * t)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::Output {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::Output {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::Output {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

fn finite(value: f32) -> Result<f32, Error> {
    let value = NotNan::new(value)
        .map_err(|e| Error::ConstructNotNan(e, value))?
        .into_inner();
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFiniteCoordinate(value))
    }
}

/// Maps points from image space to target space with independent width and
/// height ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescaler {
    ratio_w: f32,
    ratio_h: f32,
}

impl Rescaler {
    pub fn new(src: Size, dst: Size) -> Result<Self, Error> {
        if src.is_empty() || dst.is_empty() {
            return Err(Error::DegenerateRescale(src, dst));
        }
        let ratio = |num: usize, den: usize| -> Result<f32, Error> {
            Ok(num.to_f32().ok_or(Error::ConvertToF32)? / den.to_f32().ok_or(Error::ConvertToF32)?)
        };
        Ok(Self {
            ratio_w: ratio(dst.width, src.width)?,
            ratio_h: ratio(dst.height, src.height)?,
        })
    }

    pub fn rescale(&self, point: Point) -> Point {
        Point {
            x: point.x * self.ratio_w,
            y: point.y * self.ratio_h,
        }
    }
}

/// Rescale a single point from `src` space into `dst` space.
pub fn rescale(point: Point, src: Size, dst: Size) -> Result<Point, Error> {
    Ok(Rescaler::new(src, dst)?.rescale(point))
}

type Pair = (f64, f64);

/// Clip `a`-`b` to `lo <= u <= hi` along its first coordinate `u`. Clipped
/// endpoints land exactly on the boundary.
fn clip_axis(a: Pair, b: Pair, lo: f64, hi: f64) -> Option<(Pair, Pair)> {
    if (a.0 < lo && b.0 < lo) || (a.0 > hi && b.0 > hi) {
        return None;
    }
    // only reached for endpoints on opposite sides of a boundary, so `b.0 != a.0`
    let at = |u: f64| (u, a.1 + (b.1 - a.1) * ((u - a.0) / (b.0 - a.0)));
    let clamp = |p: Pair| {
        if p.0 < lo {
            at(lo)
        } else if p.0 > hi {
            at(hi)
        } else {
            p
        }
    };
    Some((clamp(a), clamp(b)))
}

/// Clip the segment `a`-`b` to the rectangle `[min, max]`, first along x and
/// then along y. Arithmetic is done in `f64`; endpoints already inside the
/// rectangle are returned unchanged.
///
/// Returns `None` when the segment lies entirely outside.
pub(crate) fn clip_segment(a: Point, b: Point, min: Point, max: Point) -> Option<(Point, Point)> {
    let widen = |p: Point| (f64::from(p.x), f64::from(p.y));
    let swap = |(u, v): Pair| (v, u);

    let (a, b) = clip_axis(widen(a), widen(b), f64::from(min.x), f64::from(max.x))?;
    let (a, b) = clip_axis(swap(a), swap(b), f64::from(min.y), f64::from(max.y))?;

    let narrow = |(y, x): Pair| Point {
        x: x as f32,
        y: y as f32,
    };
    Some((narrow(a), narrow(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod point_tests {
        use super::Point;
        use crate::error::ErrorKind;

        #[test]
        fn xy_points() {
            let a = Point::new(0.5, 0.5).unwrap();
            let b = Point::new(1.0, 1.0).unwrap();
            assert_eq!(a.squared_distance(b), 0.5);
        }

        #[test]
        fn nan_is_rejected() {
            let err = Point::new(f32::NAN, 1.0).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidGeometry);
        }

        #[test]
        fn infinity_is_rejected() {
            let err = Point::new(1.0, f32::NEG_INFINITY).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidGeometry);
        }

        #[test]
        fn distance_to_segment_interior() {
            let p = Point::new(5.0, 3.0).unwrap();
            let a = Point::new(0.0, 0.0).unwrap();
            let b = Point::new(10.0, 0.0).unwrap();
            assert_eq!(p.squared_distance_to_segment(a, b), 9.0);
        }

        #[test]
        fn distance_to_segment_past_endpoint() {
            let p = Point::new(13.0, 4.0).unwrap();
            let a = Point::new(0.0, 0.0).unwrap();
            let b = Point::new(10.0, 0.0).unwrap();
            assert_eq!(p.squared_distance_to_segment(a, b), 25.0);
        }

        #[test]
        fn distance_to_degenerate_segment() {
            let p = Point::new(3.0, 4.0).unwrap();
            let a = Point::new(0.0, 0.0).unwrap();
            assert_eq!(p.squared_distance_to_segment(a, a), 25.0);
        }
    }

    mod size_tests {
        use super::Size;
        use crate::error::ErrorKind;

        #[test]
        fn parse() {
            assert_eq!("64x48".parse::<Size>().unwrap(), Size::new(64, 48));
            assert_eq!(" 512 X 256 ".parse::<Size>().unwrap(), Size::new(512, 256));
        }

        #[test]
        fn parse_garbage() {
            let err = "64by48".parse::<Size>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig);
            assert!("x48".parse::<Size>().is_err());
        }

        #[test]
        fn shape_is_rows_then_cols() {
            assert_eq!(Size::new(64, 48).shape(), (48, 64));
        }
    }

    mod rescale_tests {
        use super::{rescale, Point, Rescaler, Size};
        use crate::error::ErrorKind;
        use assert_approx_eq::assert_approx_eq;

        #[test]
        fn uniform() {
            let p = rescale(
                Point::new(256.0, 256.0).unwrap(),
                Size::new(512, 512),
                Size::new(64, 64),
            )
            .unwrap();
            assert_approx_eq!(p.x(), 32.0);
            assert_approx_eq!(p.y(), 32.0);
        }

        #[test]
        fn non_uniform() {
            let p = rescale(
                Point::new(100.0, 100.0).unwrap(),
                Size::new(400, 200),
                Size::new(40, 40),
            )
            .unwrap();
            assert_approx_eq!(p.x(), 10.0);
            assert_approx_eq!(p.y(), 20.0);
        }

        #[test]
        fn identity_when_sizes_match() {
            let rescaler = Rescaler::new(Size::new(64, 48), Size::new(64, 48)).unwrap();
            let p = Point::new(12.25, 40.5).unwrap();
            assert_eq!(rescaler.rescale(p), p);
        }

        #[test]
        fn no_clamping() {
            let p = rescale(
                Point::new(-64.0, 1024.0).unwrap(),
                Size::new(512, 512),
                Size::new(64, 64),
            )
            .unwrap();
            assert_approx_eq!(p.x(), -8.0);
            assert_approx_eq!(p.y(), 128.0);
        }

        #[test]
        fn zero_source_dimension() {
            let err = Rescaler::new(Size::new(512, 0), Size::new(64, 64)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidGeometry);
        }

        #[test]
        fn zero_target_dimension() {
            let err = Rescaler::new(Size::new(512, 512), Size::new(0, 64)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidGeometry);
        }
    }

    mod clip_segment_tests {
        use super::{clip_segment, Point};
        use assert_approx_eq::assert_approx_eq;

        fn p(x: f32, y: f32) -> Point {
            Point::new(x, y).unwrap()
        }

        #[test]
        fn inside_is_unchanged() {
            let (a, b) = clip_segment(p(1.0, 2.0), p(5.0, 6.0), p(0.0, 0.0), p(10.0, 10.0)).unwrap();
            assert_eq!(a, p(1.0, 2.0));
            assert_eq!(b, p(5.0, 6.0));
        }

        #[test]
        fn crossing_is_shortened() {
            let (a, b) =
                clip_segment(p(-10.0, 5.0), p(20.0, 5.0), p(0.0, 0.0), p(10.0, 10.0)).unwrap();
            assert_approx_eq!(a.x(), 0.0);
            assert_approx_eq!(a.y(), 5.0);
            assert_approx_eq!(b.x(), 10.0);
            assert_approx_eq!(b.y(), 5.0);
        }

        #[test]
        fn outside_is_dropped() {
            assert!(clip_segment(p(-10.0, -5.0), p(-1.0, -5.0), p(0.0, 0.0), p(10.0, 10.0)).is_none());
            assert!(clip_segment(p(-5.0, 20.0), p(20.0, 11.0), p(0.0, 0.0), p(10.0, 10.0)).is_none());
        }

        #[test]
        fn far_endpoints_land_on_the_boundary() {
            for &m in &[1e6_f32, 1e8, 1e12, 1e20] {
                let (a, b) =
                    clip_segment(p(-m, 20.0), p(m, 20.0), p(-128.0, -128.0), p(192.0, 192.0))
                        .unwrap();
                assert_eq!(a, p(-128.0, 20.0));
                assert_eq!(b, p(192.0, 20.0));
            }
        }

        #[test]
        fn far_diagonal_crosses_the_middle() {
            let (a, b) =
                clip_segment(p(-1e8, -1e8), p(1e8, 1e8), p(0.0, 0.0), p(10.0, 10.0)).unwrap();
            assert_approx_eq!(a.x(), 0.0);
            assert_approx_eq!(a.y(), 0.0);
            assert_approx_eq!(b.x(), 10.0);
            assert_approx_eq!(b.y(), 10.0);
        }
    }
}
