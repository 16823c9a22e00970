use crate::geometry::Size;

/// Coarse classification of [`Error`] values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidScene,
    InvalidGeometry,
    UnknownVisibilityCode,
    InvalidTopology,
    InvalidConfig,
    Worker,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot build targets for a scene with no people")]
    EmptyScene,

    #[error("person {person} has {got} joints, expected {expected}")]
    JointCountMismatch {
        person: usize,
        expected: usize,
        got: usize,
    },

    #[error("joint index {0} is out of bounds for people with {1} joints")]
    JointIndexOutOfRange(usize, usize),

    #[error("cannot rescale from source size {0} to target size {1}: zero dimension")]
    DegenerateRescale(Size, Size),

    #[error("failed to construct NotNan from f32: {1}")]
    ConstructNotNan(#[source] ordered_float::FloatIsNan, f32),

    #[error("coordinate must be finite, got {0}")]
    NonFiniteCoordinate(f32),

    #[error("unknown visibility code: {0}")]
    UnknownVisibilityCode(f64),

    #[error("bone ({0}, {1}) uses 1-based indices, 0 is not a valid joint index")]
    ZeroBoneIndex(usize, usize),

    #[error("bone {bone} references joint {joint}, but people only have {num_joints} joints")]
    BoneOutOfRange {
        bone: usize,
        joint: usize,
        num_joints: usize,
    },

    #[error("gaussian spread must be finite and positive, got {0}")]
    InvalidTheta(f32),

    #[error("line thickness must be at least 1 pixel")]
    InvalidThickness,

    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("failed to parse size {0:?}, expected WIDTHxHEIGHT")]
    ParseSize(String),

    #[error("failed to parse line rendering mode {0:?}, expected round, truncate or subpixel")]
    ParseLineRendering(String),

    #[error("failed to parse joint {0:?}, expected x,y,visibility")]
    ParseJoint(String),

    #[error("failed to parse bone {0:?}, expected A-B")]
    ParseBone(String),

    #[error("failed to convert value to usize")]
    ConvertToUSize,

    #[error("failed to convert value to f32")]
    ConvertToF32,

    #[error("a target worker thread panicked")]
    WorkerPanicked,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyScene | Self::JointCountMismatch { .. } | Self::JointIndexOutOfRange(..) => {
                ErrorKind::InvalidScene
            }
            Self::DegenerateRescale(..)
            | Self::ConstructNotNan(..)
            | Self::NonFiniteCoordinate(_) => ErrorKind::InvalidGeometry,
            Self::UnknownVisibilityCode(_) => ErrorKind::UnknownVisibilityCode,
            Self::ZeroBoneIndex(..) | Self::BoneOutOfRange { .. } | Self::ParseBone(_) => {
                ErrorKind::InvalidTopology
            }
            Self::InvalidTheta(_)
            | Self::InvalidThickness
            | Self::InvalidWorkerCount
            | Self::ParseSize(_)
            | Self::ParseLineRendering(_)
            | Self::ParseJoint(_)
            | Self::ConvertToUSize
            | Self::ConvertToF32 => ErrorKind::InvalidConfig,
            Self::WorkerPanicked => ErrorKind::Worker,
        }
    }
}
