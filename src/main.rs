use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use num_traits::FromPrimitive;
use pose_targets::{
    report::{ascii_preview, channel_stats, max_projection},
    skeleton::NUM_AIC_JOINTS,
    AicJoint, Bone, Crowd, Person, PolicyTargets, Skeleton, TargetBuilder, TargetConfig,
    VisibilityPolicy,
};
use std::time::Instant;
use structopt::StructOpt;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;

#[derive(structopt::StructOpt)]
struct Opt {
    /// One annotated person: whitespace or ';' separated `x,y,v` joints in
    /// image coordinates. Repeat for every person in the scene.
    #[structopt(short, long = "person", required = true, number_of_values = 1)]
    people: Vec<Person>,

    /// A 1-based `A-B` joint pair. Repeat to build a custom skeleton; the AI
    /// Challenger limbs are used when none are given.
    #[structopt(short, long = "bone", number_of_values = 1)]
    bones: Vec<Bone>,

    #[structopt(flatten)]
    config: TargetConfig,

    /// Number of times to build the scene's targets, for timing.
    #[structopt(short, long, default_value = "1")]
    iterations: usize,

    /// Print an ASCII rendering of every stack's maximum projection.
    #[structopt(long)]
    preview: bool,

    #[structopt(short, long, default_value = "info", env = "RUST_LOG")]
    log_level: tracing_subscriber::filter::EnvFilter,

    #[structopt(short, long)]
    show_progress: bool,
}

fn joint_name(num_joints: usize, joint: usize) -> String {
    match AicJoint::from_usize(joint) {
        Some(kind) if num_joints == NUM_AIC_JOINTS => format!("{:?}", kind),
        _ => format!("joint {}", joint + 1),
    }
}

fn print_targets(targets: &PolicyTargets, skeleton: &Skeleton, preview: bool) {
    let num_joints = targets.confidence.shape()[0];
    println!("{:?} confidence {:?}", targets.policy, targets.confidence.shape());
    for stats in channel_stats(&targets.confidence) {
        println!(
            "  {:<16} peak {:.3} at {:?}, coverage {:.4}",
            joint_name(num_joints, stats.channel),
            stats.peak,
            stats.peak_at,
            stats.coverage
        );
    }

    println!("{:?} affinity {:?}", targets.policy, targets.affinity.shape());
    for (stats, &Bone(a, b)) in channel_stats(&targets.affinity)
        .into_iter()
        .zip(skeleton.bones())
    {
        println!(
            "  {:<16} peak {:.3}, coverage {:.4}",
            format!("bone {}-{}", a + 1, b + 1),
            stats.peak,
            stats.coverage
        );
    }

    if preview {
        println!("{:?} confidence, all joints", targets.policy);
        print!("{}", ascii_preview(&max_projection(&targets.confidence)));
        println!("{:?} affinity, all bones", targets.policy);
        print!("{}", ascii_preview(&max_projection(&targets.affinity)));
    }
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(opt.log_level),
    )?;

    let skeleton = if opt.bones.is_empty() {
        Skeleton::aic()
    } else {
        Skeleton::new(opt.bones)
    };
    let builder =
        TargetBuilder::new(opt.config, skeleton).context("failed constructing target builder")?;
    let crowd = Crowd::new(opt.people).context("failed validating annotations")?;

    info!(
        message = "building targets",
        people = crowd.len(),
        joints = crowd.num_joints(),
        bones = builder.skeleton().len(),
        target_size = %builder.config().target_size,
        image_size = %builder.config().image_size,
    );

    let pb = if opt.show_progress {
        Some(
            ProgressBar::new_spinner().with_style(
                ProgressStyle::default_spinner()
                    .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                    .template("{prefix:.bold.dim} {spinner} {wide_msg}"),
            ),
        )
    } else {
        None
    };

    let start = Instant::now();
    let targets = builder.build(&crowd).context("failed building targets")?;
    for iteration in 1..opt.iterations {
        let rebuilt = builder.build(&crowd).context("failed building targets")?;
        debug!(iteration, same = rebuilt == targets);
        if let Some(pb) = pb.as_ref() {
            pb.set_message(format!("iteration {}/{}", iteration + 1, opt.iterations));
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let elapsed = start.elapsed();
    let iterations = opt.iterations.max(1);
    info!(
        message = "built targets",
        iterations,
        elapsed_ms = elapsed.as_secs_f64() * 1e3,
        scenes_per_sec = iterations as f64 / elapsed.as_secs_f64(),
    );

    for policy in VisibilityPolicy::ALL.iter().copied() {
        print_targets(targets.get(policy), builder.skeleton(), opt.preview);
    }

    Ok(())
}
