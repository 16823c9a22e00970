use crate::{
    affinity::AffinityLineGenerator,
    annotation::{Crowd, VisibilityPolicy},
    error::Error,
    gaussian::GaussianBlobGenerator,
    geometry::{Rescaler, Size},
    skeleton::Bone,
};
use bitvec::vec::BitVec;
use ndarray::{Array2, ArrayViewMut2};

/// People whose joint `joint_index` passes `policy`, in person order.
pub fn joint_contributors(
    crowd: &Crowd,
    joint_index: usize,
    policy: VisibilityPolicy,
) -> Result<BitVec, Error> {
    Ok(crowd
        .joints(joint_index)?
        .map(|joint| policy.admits(joint.visibility))
        .collect())
}

/// People whose both endpoints of `bone` pass `policy`, in person order.
pub fn bone_contributors(
    crowd: &Crowd,
    Bone(a, b): Bone,
    policy: VisibilityPolicy,
) -> Result<BitVec, Error> {
    Ok(crowd
        .joints(a)?
        .zip(crowd.joints(b)?)
        .map(|(first, second)| {
            policy.admits(first.visibility) && policy.admits(second.visibility)
        })
        .collect())
}

/// Max-reduces one Gaussian blob per contributing person into a single
/// confidence map per joint.
#[derive(Debug, Clone, Copy)]
pub struct JointAggregator<'a> {
    blobs: &'a GaussianBlobGenerator,
    rescaler: Rescaler,
}

impl<'a> JointAggregator<'a> {
    pub fn new(blobs: &'a GaussianBlobGenerator, image_size: Size) -> Result<Self, Error> {
        Ok(Self {
            blobs,
            rescaler: Rescaler::new(image_size, blobs.size())?,
        })
    }

    pub fn aggregate(
        &self,
        crowd: &Crowd,
        joint_index: usize,
        policy: VisibilityPolicy,
    ) -> Result<Array2<f32>, Error> {
        let mut heat = Array2::zeros(self.blobs.size().shape());
        self.aggregate_into(heat.view_mut(), crowd, joint_index, policy)?;
        Ok(heat)
    }

    /// Fill `canvas` with the aggregated map and return the number of
    /// contributing people.
    pub(crate) fn aggregate_into(
        &self,
        mut canvas: ArrayViewMut2<'_, f32>,
        crowd: &Crowd,
        joint_index: usize,
        policy: VisibilityPolicy,
    ) -> Result<usize, Error> {
        let contributors = joint_contributors(crowd, joint_index, policy)?;
        canvas.fill(0.0);
        let people = crowd.people();
        for person in contributors.iter_ones() {
            let center = self
                .rescaler
                .rescale(people[person].joints[joint_index].point);
            self.blobs.splat_max(canvas.view_mut(), center);
        }
        Ok(contributors.count_ones())
    }
}

/// Max-reduces one line field per contributing person into a single part
/// affinity map per bone.
#[derive(Debug, Clone, Copy)]
pub struct BoneAggregator<'a> {
    lines: &'a AffinityLineGenerator,
    rescaler: Rescaler,
}

impl<'a> BoneAggregator<'a> {
    pub fn new(lines: &'a AffinityLineGenerator, image_size: Size) -> Result<Self, Error> {
        Ok(Self {
            lines,
            rescaler: Rescaler::new(image_size, lines.size())?,
        })
    }

    pub fn aggregate(
        &self,
        crowd: &Crowd,
        bone: Bone,
        policy: VisibilityPolicy,
    ) -> Result<Array2<f32>, Error> {
        let mut field = Array2::zeros(self.lines.size().shape());
        self.aggregate_into(field.view_mut(), crowd, bone, policy)?;
        Ok(field)
    }

    pub(crate) fn aggregate_into(
        &self,
        mut canvas: ArrayViewMut2<'_, f32>,
        crowd: &Crowd,
        bone: Bone,
        policy: VisibilityPolicy,
    ) -> Result<usize, Error> {
        let contributors = bone_contributors(crowd, bone, policy)?;
        canvas.fill(0.0);
        let people = crowd.people();
        let Bone(a, b) = bone;
        for person in contributors.iter_ones() {
            let joints = &people[person].joints;
            let p1 = self.rescaler.rescale(joints[a].point);
            let p2 = self.rescaler.rescale(joints[b].point);
            self.lines.draw_max(canvas.view_mut(), p1, p2);
        }
        Ok(contributors.count_ones())
    }
}
