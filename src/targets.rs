use crate::{
    aggregate::{BoneAggregator, JointAggregator},
    affinity::AffinityLineGenerator,
    annotation::{Crowd, Person, VisibilityPolicy},
    config::TargetConfig,
    error::Error,
    gaussian::GaussianBlobGenerator,
    skeleton::Skeleton,
};
use ndarray::{Array3, ArrayViewMut2, Axis};
use std::time::Instant;
use tracing::{debug, trace};

/// Confidence and affinity stacks built with one visibility policy.
///
/// Confidence channel `j` is joint `j`; affinity channel `c` is bone `c` of
/// the builder's skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTargets {
    pub policy: VisibilityPolicy,
    /// Shape `(J, H, W)`.
    pub confidence: Array3<f32>,
    /// Shape `(C, H, W)`.
    pub affinity: Array3<f32>,
}

/// Every training target of one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneTargets {
    /// Only joints annotated as visible.
    pub visible: PolicyTargets,
    /// Joints annotated as visible or labeled but occluded.
    pub labeled: PolicyTargets,
}

impl SceneTargets {
    pub fn get(&self, policy: VisibilityPolicy) -> &PolicyTargets {
        match policy {
            VisibilityPolicy::VisibleOnly => &self.visible,
            VisibilityPolicy::VisibleOrLabeled => &self.labeled,
        }
    }
}

/// Builds [`SceneTargets`] for annotated scenes with a fixed configuration and
/// skeleton.
#[derive(Debug, Clone)]
pub struct TargetBuilder {
    config: TargetConfig,
    skeleton: Skeleton,
    blobs: GaussianBlobGenerator,
    lines: AffinityLineGenerator,
    workers: usize,
}

impl TargetBuilder {
    pub fn new(config: TargetConfig, skeleton: Skeleton) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            blobs: config.gaussian()?,
            lines: config.affinity()?,
            workers: config.worker_count()?,
            config,
            skeleton,
        })
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Validate `people` as a scene and build its targets.
    pub fn build_people(&self, people: Vec<Person>) -> Result<SceneTargets, Error> {
        self.build(&Crowd::new(people)?)
    }

    pub fn build(&self, crowd: &Crowd) -> Result<SceneTargets, Error> {
        let start = Instant::now();
        let targets = SceneTargets {
            visible: self.build_policy(crowd, VisibilityPolicy::VisibleOnly)?,
            labeled: self.build_policy(crowd, VisibilityPolicy::VisibleOrLabeled)?,
        };
        debug!(
            message = "built scene targets",
            people = crowd.len(),
            joints = crowd.num_joints(),
            bones = self.skeleton.len(),
            elapsed = ?start.elapsed(),
        );
        Ok(targets)
    }

    /// Build the confidence and affinity stacks for a single policy.
    pub fn build_policy(
        &self,
        crowd: &Crowd,
        policy: VisibilityPolicy,
    ) -> Result<PolicyTargets, Error> {
        let num_joints = crowd.num_joints();
        self.skeleton.validate(num_joints)?;

        let joints = JointAggregator::new(&self.blobs, self.config.image_size)?;
        let bones = BoneAggregator::new(&self.lines, self.config.image_size)?;
        let (height, width) = self.config.target_size.shape();

        let mut confidence = Array3::zeros((num_joints, height, width));
        fill_channels(&mut confidence, self.workers, |joint, channel| {
            let contributors = joints.aggregate_into(channel, crowd, joint, policy)?;
            trace!(message = "confidence channel", joint, contributors, ?policy);
            Ok(())
        })?;

        let bone_list = self.skeleton.bones();
        let mut affinity = Array3::zeros((bone_list.len(), height, width));
        fill_channels(&mut affinity, self.workers, |index, channel| {
            let bone = bone_list[index];
            let contributors = bones.aggregate_into(channel, crowd, bone, policy)?;
            trace!(message = "affinity channel", bone = index, contributors, ?policy);
            Ok(())
        })?;

        Ok(PolicyTargets {
            policy,
            confidence,
            affinity,
        })
    }
}

/// Fill every channel (axis 0) of `stack` with `fill`, splitting the channels
/// into contiguous chunks across at most `workers` scoped threads.
fn fill_channels<F>(stack: &mut Array3<f32>, workers: usize, fill: F) -> Result<(), Error>
where
    F: Fn(usize, ArrayViewMut2<'_, f32>) -> Result<(), Error> + Sync,
{
    let channels = stack.len_of(Axis(0));
    if channels == 0 {
        return Ok(());
    }

    if workers <= 1 {
        return stack
            .outer_iter_mut()
            .enumerate()
            .try_for_each(|(index, channel)| fill(index, channel));
    }

    let workers = workers.min(channels);
    let chunk = (channels + workers - 1) / workers;
    let fill = &fill;
    crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = stack
            .axis_chunks_iter_mut(Axis(0), chunk)
            .enumerate()
            .map(|(i, mut block)| {
                scope.spawn(move |_| {
                    block
                        .outer_iter_mut()
                        .enumerate()
                        .try_for_each(|(k, channel)| fill(i * chunk + k, channel))
                })
            })
            .collect();

        handles.into_iter().try_for_each(|handle| {
            handle.join().map_err(|_| Error::WorkerPanicked)?
        })
    })
    .map_err(|_| Error::WorkerPanicked)?
}
