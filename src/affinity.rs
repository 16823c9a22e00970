use crate::{
    error::Error,
    geometry::{self, Point, Rescaler, Size},
};
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{self as eg, Dimensions},
    pixelcolor::{Gray8, GrayColor},
    primitives::{Circle, Line, Primitive, PrimitiveStyle, Rectangle},
    Drawable, Pixel,
};
use ndarray::{Array2, ArrayViewMut2};
use num_traits::ToPrimitive;
use std::{convert::Infallible, fmt, str::FromStr};

/// How line endpoints are placed on the target grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LineRendering {
    /// Round endpoints to the nearest pixel, then rasterize.
    Round,
    /// Truncate endpoints toward zero, then rasterize.
    Truncate,
    /// Light every pixel whose center is within half the thickness of the
    /// continuous segment.
    SubPixel,
}

impl fmt::Display for LineRendering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Round => "round",
            Self::Truncate => "truncate",
            Self::SubPixel => "subpixel",
        })
    }
}

impl FromStr for LineRendering {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round" => Ok(Self::Round),
            "truncate" => Ok(Self::Truncate),
            "subpixel" | "sub-pixel" => Ok(Self::SubPixel),
            _ => Err(Error::ParseLineRendering(s.to_owned())),
        }
    }
}

/// Renders thick limb segments, normalized so that line pixels are 1 and the
/// background is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffinityLineGenerator {
    size: Size,
    thickness: u32,
    rendering: LineRendering,
}

impl AffinityLineGenerator {
    pub fn new(size: Size, thickness: u32, rendering: LineRendering) -> Result<Self, Error> {
        if thickness == 0 {
            return Err(Error::InvalidThickness);
        }
        Ok(Self {
            size,
            thickness,
            rendering,
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    pub fn rendering(&self) -> LineRendering {
        self.rendering
    }

    /// Render the segment `p1`-`p2`, given in target space.
    pub fn generate(&self, p1: Point, p2: Point) -> Array2<f32> {
        let mut field = Array2::zeros(self.size.shape());
        self.draw_max(field.view_mut(), p1, p2);
        field
    }

    /// Render a segment whose endpoints are given in `img_size` image space.
    pub fn generate_for_image_points(
        &self,
        p1: Point,
        p2: Point,
        img_size: Size,
    ) -> Result<Array2<f32>, Error> {
        let rescaler = Rescaler::new(img_size, self.size)?;
        Ok(self.generate(rescaler.rescale(p1), rescaler.rescale(p2)))
    }

    /// Write `max(canvas, line)` into `canvas`.
    pub(crate) fn draw_max(&self, canvas: ArrayViewMut2<'_, f32>, p1: Point, p2: Point) {
        debug_assert_eq!(canvas.dim(), self.size.shape());
        match self.rendering {
            LineRendering::Round => self.rasterize(canvas, p1, p2, f32::round),
            LineRendering::Truncate => self.rasterize(canvas, p1, p2, f32::trunc),
            LineRendering::SubPixel => self.draw_sub_pixel(canvas, p1, p2),
        }
    }

    fn rasterize(
        &self,
        canvas: ArrayViewMut2<'_, f32>,
        p1: Point,
        p2: Point,
        snap: fn(f32) -> f32,
    ) {
        let (p1, p2) = match self.clip(p1, p2) {
            Some(clipped) => clipped,
            None => return,
        };
        // clipping bounds the endpoints well within i32
        let start = eg::Point::new(snap(p1.x()) as i32, snap(p1.y()) as i32);
        let end = eg::Point::new(snap(p2.x()) as i32, snap(p2.y()) as i32);

        let mut target = Canvas(canvas);
        let drawn = if start == end {
            Circle::with_center(start, self.thickness)
                .into_styled(PrimitiveStyle::with_fill(Gray8::WHITE))
                .draw(&mut target)
        } else {
            Line::new(start, end)
                .into_styled(PrimitiveStyle::with_stroke(Gray8::WHITE, self.thickness))
                .draw(&mut target)
        };
        match drawn {
            Ok(()) => {}
            Err(infallible) => match infallible {},
        }
    }

    /// Clip the segment to the canvas grown by a margin, so that the
    /// rasterizer never walks far outside the grid.
    fn clip(&self, p1: Point, p2: Point) -> Option<(Point, Point)> {
        let margin = self.size.width.max(self.size.height).to_f32()? + self.thickness.to_f32()?;
        let min = Point::new(-margin, -margin).ok()?;
        let max = Point::new(
            self.size.width.to_f32()? + margin,
            self.size.height.to_f32()? + margin,
        )
        .ok()?;
        geometry::clip_segment(p1, p2, min, max)
    }

    fn draw_sub_pixel(&self, mut canvas: ArrayViewMut2<'_, f32>, p1: Point, p2: Point) {
        let (height, width) = canvas.dim();
        if height == 0 || width == 0 {
            return;
        }
        // the margin exceeds half the thickness, so clipping never changes
        // which in-canvas pixels are lit
        let (p1, p2) = match self.clip(p1, p2) {
            Some(clipped) => clipped,
            None => return,
        };
        let half = self.thickness as f32 / 2.0;
        let half_squared = half * half;

        let span = |lo: f32, hi: f32, len: usize| {
            let last = (len - 1) as f32;
            let lo = (lo - half).floor();
            let hi = (hi + half).ceil();
            if hi < 0.0 || lo > last {
                None
            } else {
                Some((lo.max(0.0) as usize, hi.min(last) as usize))
            }
        };
        let xs = span(p1.x().min(p2.x()), p1.x().max(p2.x()), width);
        let ys = span(p1.y().min(p2.y()), p1.y().max(p2.y()), height);
        let ((x0, x1), (y0, y1)) = match (xs, ys) {
            (Some(xs), Some(ys)) => (xs, ys),
            _ => return,
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                if Point::from_pixel(x, y).squared_distance_to_segment(p1, p2) <= half_squared {
                    canvas[[y, x]] = 1.0;
                }
            }
        }
    }
}

/// An `embedded-graphics` draw target over a float canvas. Drawn gray levels
/// are normalized by the full intensity and max-combined with the canvas.
struct Canvas<'a>(ArrayViewMut2<'a, f32>);

impl Dimensions for Canvas<'_> {
    fn bounding_box(&self) -> Rectangle {
        let (height, width) = self.0.dim();

        Rectangle {
            top_left: eg::Point { x: 0, y: 0 },
            size: eg::Size {
                width: width as u32,
                height: height as u32,
            },
        }
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Gray8;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (height, width) = self.0.dim();
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && (point.x as usize) < width
                && point.y >= 0
                && (point.y as usize) < height
            {
                let value = f32::from(color.luma()) / f32::from(u8::MAX);
                let cell = &mut self.0[[point.y as usize, point.x as usize]];
                if value > *cell {
                    *cell = value;
                }
            }
        }

        Ok(())
    }
}
