use crate::{
    error::Error,
    geometry::{Point, Rescaler, Size},
};
use ndarray::{Array2, ArrayViewMut2};

/// Renders unnormalized Gaussian confidence blobs on a fixed target grid.
///
/// The peak of a blob is exactly 1 at its continuous center, so blobs of
/// several people combine with an element-wise maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBlobGenerator {
    size: Size,
    theta: f32,
}

impl GaussianBlobGenerator {
    pub fn new(size: Size, theta: f32) -> Result<Self, Error> {
        if !(theta.is_finite() && theta > 0.0) {
            return Err(Error::InvalidTheta(theta));
        }
        Ok(Self { size, theta })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Render a blob centered on `center`, given in target space.
    pub fn generate(&self, center: Point) -> Array2<f32> {
        let mut heat = Array2::zeros(self.size.shape());
        self.splat_max(heat.view_mut(), center);
        heat
    }

    /// Render a blob for a point given in `img_size` image space.
    pub fn generate_for_image_point(
        &self,
        center: Point,
        img_size: Size,
    ) -> Result<Array2<f32>, Error> {
        let rescaler = Rescaler::new(img_size, self.size)?;
        Ok(self.generate(rescaler.rescale(center)))
    }

    /// Write `max(canvas, blob)` into `canvas`.
    pub(crate) fn splat_max(&self, mut canvas: ArrayViewMut2<'_, f32>, center: Point) {
        debug_assert_eq!(canvas.dim(), self.size.shape());
        let theta_squared = self.theta * self.theta;
        let (cx, cy) = (center.x(), center.y());
        for ((y, x), value) in canvas.indexed_iter_mut() {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let heat = (-(dx * dx + dy * dy) / theta_squared).exp();
            if heat > *value {
                *value = heat;
            }
        }
    }
}
