use crate::{
    affinity::{AffinityLineGenerator, LineRendering},
    error::Error,
    gaussian::GaussianBlobGenerator,
    geometry::{Rescaler, Size},
};

pub const DEFAULT_TARGET_SIZE: &str = "64x64";
pub const DEFAULT_IMAGE_SIZE: &str = "512x512";
pub const DEFAULT_THETA: &str = "4";
pub const DEFAULT_THICKNESS: &str = "2";
pub const DEFAULT_LINE_RENDERING: &str = "round";

/// Everything a [`TargetBuilder`](crate::TargetBuilder) needs besides the
/// skeleton. Train and validation pipelines can each carry their own.
#[derive(Debug, Clone, Copy, PartialEq, structopt::StructOpt)]
pub struct TargetConfig {
    /// Resolution of the generated target maps, WIDTHxHEIGHT.
    #[structopt(long, default_value = DEFAULT_TARGET_SIZE)]
    pub target_size: Size,

    /// Resolution of the image space the annotations are given in, WIDTHxHEIGHT.
    #[structopt(long, default_value = DEFAULT_IMAGE_SIZE)]
    pub image_size: Size,

    /// Gaussian spread of confidence blobs, in target pixels.
    #[structopt(long, default_value = DEFAULT_THETA)]
    pub theta: f32,

    /// Thickness of part affinity lines, in target pixels.
    #[structopt(long, default_value = DEFAULT_THICKNESS)]
    pub thickness: u32,

    /// Line endpoint placement: round, truncate or subpixel.
    #[structopt(long, default_value = DEFAULT_LINE_RENDERING)]
    pub line_rendering: LineRendering,

    /// Number of worker threads filling target channels. Defaults to the
    /// available parallelism.
    #[structopt(long)]
    pub workers: Option<usize>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            target_size: Size::new(64, 64),
            image_size: Size::new(512, 512),
            theta: 4.0,
            thickness: 2,
            line_rendering: LineRendering::Round,
            workers: None,
        }
    }
}

impl TargetConfig {
    pub fn validate(&self) -> Result<(), Error> {
        Rescaler::new(self.image_size, self.target_size)?;
        self.gaussian()?;
        self.affinity()?;
        self.worker_count()?;
        Ok(())
    }

    pub fn gaussian(&self) -> Result<GaussianBlobGenerator, Error> {
        GaussianBlobGenerator::new(self.target_size, self.theta)
    }

    pub fn affinity(&self) -> Result<AffinityLineGenerator, Error> {
        AffinityLineGenerator::new(self.target_size, self.thickness, self.line_rendering)
    }

    pub fn worker_count(&self) -> Result<usize, Error> {
        match self.workers {
            Some(0) => Err(Error::InvalidWorkerCount),
            Some(workers) => Ok(workers),
            None => Ok(std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TargetConfig;
    use crate::{affinity::LineRendering, error::ErrorKind, geometry::Size};
    use structopt::StructOpt;

    #[test]
    fn derived_defaults_match_default_impl() {
        let parsed = TargetConfig::from_iter_safe(&["pose-targets"]).unwrap();
        assert_eq!(parsed, TargetConfig::default());
    }

    #[test]
    fn parse_flags() {
        let parsed = TargetConfig::from_iter_safe(&[
            "pose-targets",
            "--target-size",
            "46x46",
            "--image-size",
            "368x368",
            "--theta",
            "2.5",
            "--thickness",
            "3",
            "--line-rendering",
            "subpixel",
            "--workers",
            "2",
        ])
        .unwrap();
        assert_eq!(parsed.target_size, Size::new(46, 46));
        assert_eq!(parsed.image_size, Size::new(368, 368));
        assert_eq!(parsed.theta, 2.5);
        assert_eq!(parsed.thickness, 3);
        assert_eq!(parsed.line_rendering, LineRendering::SubPixel);
        assert_eq!(parsed.worker_count().unwrap(), 2);
    }

    #[test]
    fn default_is_valid() {
        TargetConfig::default().validate().unwrap();
        assert!(TargetConfig::default().worker_count().unwrap() >= 1);
    }

    #[test]
    fn invalid_configs() {
        let config = TargetConfig {
            theta: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidConfig);

        let config = TargetConfig {
            thickness: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidConfig);

        let config = TargetConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidConfig);

        let config = TargetConfig {
            image_size: Size::new(512, 0),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidGeometry);
    }
}
