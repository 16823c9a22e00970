use crate::error::Error;
use num_traits::ToPrimitive;
use std::str::FromStr;

/// Joint layout of the AI Challenger keypoint dataset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum AicJoint {
    RightShoulder,
    RightElbow,
    RightWrist,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    RightHip,
    RightKnee,
    RightAnkle,
    LeftHip,
    LeftKnee,
    LeftAnkle,
    HeadTop,
    Neck,
}

impl AicJoint {
    pub fn idx(self) -> Result<usize, Error> {
        self.to_usize().ok_or(Error::ConvertToUSize)
    }
}

pub const NUM_AIC_JOINTS: usize = 14;

pub mod constants {
    /// AI Challenger limbs as 1-based joint index pairs, the form they are
    /// distributed in.
    pub const AIC_BONES: [(usize, usize); 11] = [
        (1, 2),
        (2, 3),
        (4, 5),
        (5, 6),
        (14, 1),
        (14, 4),
        (7, 8),
        (8, 9),
        (10, 11),
        (11, 12),
        (13, 14),
    ];
}

/// A connection between two joints, as 0-based joint indices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Bone(pub usize, pub usize);

/// Parses a 1-based `A-B` pair into a 0-based bone.
impl FromStr for Bone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || Error::ParseBone(s.to_owned());
        let (a, b) = s.trim().split_once('-').ok_or_else(parse_error)?;
        let a = a.trim().parse().map_err(|_| parse_error())?;
        let b = b.trim().parse().map_err(|_| parse_error())?;
        Bone::from_one_based(a, b)
    }
}

impl Bone {
    pub fn from_one_based(a: usize, b: usize) -> Result<Self, Error> {
        match (a.checked_sub(1), b.checked_sub(1)) {
            (Some(a), Some(b)) => Ok(Self(a, b)),
            _ => Err(Error::ZeroBoneIndex(a, b)),
        }
    }
}

/// Ordered bone list shared by every scene of a dataset. Affinity channel `c`
/// is always `bones()[c]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new(bones: Vec<Bone>) -> Self {
        Self { bones }
    }

    /// Ingest an externally supplied, 1-based bone list.
    pub fn from_one_based<I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        pairs
            .into_iter()
            .map(|(a, b)| Bone::from_one_based(a, b))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// The AI Challenger limbs. The 1-based table has no zero index, so every
    /// pair converts.
    pub fn aic() -> Self {
        Self::new(
            constants::AIC_BONES
                .iter()
                .filter_map(|&(a, b)| Bone::from_one_based(a, b).ok())
                .collect(),
        )
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Check every bone against people with `num_joints` joints.
    pub fn validate(&self, num_joints: usize) -> Result<(), Error> {
        self.bones
            .iter()
            .enumerate()
            .try_for_each(|(bone, &Bone(a, b))| {
                [a, b].iter().try_for_each(|&joint| {
                    if joint < num_joints {
                        Ok(())
                    } else {
                        Err(Error::BoneOutOfRange {
                            bone,
                            joint,
                            num_joints,
                        })
                    }
                })
            })
    }
}
