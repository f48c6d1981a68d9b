use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use fourlink_cli::{load_description, logging, select_joints};
use fourlink_model::{JointMotion, ModelFormat, RobotDescription};
use nalgebra as na;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Model description file, json or yaml
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Sets the level of verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log as json lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    /// Print the link table and named poses
    Info,
    /// End effector position and orientation
    Fkine(JointArgs),
    /// Geometric Jacobian in the world frame
    Jacobian(JointArgs),
    /// Gravity load and joint space inertia
    Dynamics(JointArgs),
    /// Walk in joint space between two named poses
    Sweep {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Largest joint step in radians
        #[arg(long, default_value_t = 0.1)]
        step: f64,
    },
    /// Write the model description to a file
    Export {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct JointArgs {
    /// Named pose such as qz, qn or qt
    #[arg(long, conflicts_with = "joints")]
    pose: Option<String>,

    /// Comma separated joint values in radians
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    joints: Vec<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

impl From<Format> for ModelFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ModelFormat::Json,
            Format::Yaml => ModelFormat::Yaml,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::setup_tracing(args.verbose, args.json_logs);

    let description = load_description(args.model.as_deref())?;
    tracing::debug!("Using model {}", description.robot.name());

    match args.command {
        SubCommand::Info => info(&description),
        SubCommand::Fkine(joints) => fkine(&description, &joints)?,
        SubCommand::Jacobian(joints) => jacobian(&description, &joints)?,
        SubCommand::Dynamics(joints) => dynamics(&description, &joints)?,
        SubCommand::Sweep { from, to, step } => sweep(&description, &from, &to, step)?,
        SubCommand::Export { format, path } => {
            description.save(&path, format.into())?;
            tracing::info!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn info(description: &RobotDescription) {
    println!("{}", description.robot);
    let gravity = description.robot.gravity();
    println!(
        "gravity: [{:.3}, {:.3}, {:.3}]",
        gravity.x, gravity.y, gravity.z
    );
    for pose in description.poses.iter() {
        let values: Vec<String> = pose.joints().iter().map(|q| format!("{:.4}", q)).collect();
        match pose.description() {
            Some(text) => println!("{}: [{}] {}", pose.name(), values.join(", "), text),
            None => println!("{}: [{}]", pose.name(), values.join(", ")),
        }
    }
}

fn fkine(description: &RobotDescription, args: &JointArgs) -> Result<()> {
    let q = select_joints(description, args.pose.as_deref(), &args.joints)?;
    let pose = description.robot.fkine(&q)?;
    print_pose(&pose);
    if !description.robot.within_limits(&q) {
        tracing::warn!("Joint values are outside of the link limits");
    }
    Ok(())
}

fn print_pose(pose: &na::Isometry3<f64>) {
    let (roll, pitch, yaw) = pose.rotation.euler_angles();
    println!(
        "end_effector:\n   x: {:.4}\n   y: {:.4}\n   z: {:.4}\n   roll: {:.3}\n   pitch: {:.3}\n   yaw: {:.3}",
        pose.translation.x,
        pose.translation.y,
        pose.translation.z,
        roll.to_degrees(),
        pitch.to_degrees(),
        yaw.to_degrees()
    );
}

fn jacobian(description: &RobotDescription, args: &JointArgs) -> Result<()> {
    let q = select_joints(description, args.pose.as_deref(), &args.joints)?;
    let jacobian = description.robot.jacob0(&q)?;
    println!("jacobian (linear rows first):{:.4}", jacobian);
    Ok(())
}

fn dynamics(description: &RobotDescription, args: &JointArgs) -> Result<()> {
    let q = select_joints(description, args.pose.as_deref(), &args.joints)?;
    let gravity = description.robot.gravload(&q)?;
    let inertia = description.robot.inertia(&q)?;
    println!("gravity load:{:.4}", gravity.transpose());
    println!("inertia:{:.4}", inertia);
    Ok(())
}

fn sweep(description: &RobotDescription, from: &str, to: &str, step: f64) -> Result<()> {
    let start = description.poses.get(from)?;
    let target = description.poses.get(to)?;
    let motion = JointMotion::between(start, target, step)?;
    let first = description.robot.fkine(start.joints())?.translation;
    println!("0: [{:.4}, {:.4}, {:.4}]", first.x, first.y, first.z);
    for (index, joints) in motion.enumerate() {
        let position = description.robot.fkine(joints.as_slice())?.translation;
        println!(
            "{}: [{:.4}, {:.4}, {:.4}]",
            index + 1,
            position.x,
            position.y,
            position.z
        );
    }
    Ok(())
}
