//! Dense training targets for multi-person pose estimation.
//!
//! Sparse per-person keypoint annotations are turned into two stacks per
//! scene: Gaussian confidence maps, one channel per joint, and part affinity
//! line maps, one channel per skeleton bone. Both are built for two
//! visibility policies, visible joints only and visible-or-occluded joints.
//!
//! ```
//! use pose_targets::{
//!     skeleton::NUM_AIC_JOINTS, Crowd, Joint, Person, Skeleton, TargetBuilder, TargetConfig,
//!     Visibility,
//! };
//!
//! # fn main() -> Result<(), pose_targets::Error> {
//! let builder = TargetBuilder::new(TargetConfig::default(), Skeleton::aic())?;
//! let mut joints = vec![Joint::unlabeled(); NUM_AIC_JOINTS];
//! joints[13] = Joint::new(256.0, 256.0, Visibility::Visible)?;
//! let targets = builder.build(&Crowd::new(vec![Person::new(joints)])?)?;
//! assert_eq!(targets.visible.confidence[[13, 32, 32]], 1.0);
//! # Ok(())
//! # }
//! ```

pub mod affinity;
pub mod aggregate;
pub mod annotation;
pub mod config;
pub mod error;
pub mod gaussian;
pub mod geometry;
pub mod report;
pub mod skeleton;
pub mod targets;

pub use affinity::{AffinityLineGenerator, LineRendering};
pub use aggregate::{BoneAggregator, JointAggregator};
pub use annotation::{Crowd, Joint, Person, Visibility, VisibilityPolicy};
pub use config::TargetConfig;
pub use error::{Error, ErrorKind};
pub use gaussian::GaussianBlobGenerator;
pub use geometry::{rescale, Point, Rescaler, Size};
pub use skeleton::{AicJoint, Bone, Skeleton};
pub use targets::{PolicyTargets, SceneTargets, TargetBuilder};
