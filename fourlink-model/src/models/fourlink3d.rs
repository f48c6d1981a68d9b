//! Simple upright four-link arm.
//!
//! Three-dimensional four-link chain from the IK solver example. Links carry
//! unit mass, the first link stands the chain upright and the remaining three
//! swing in a vertical plane.
//!
//! Poses:
//!
//! - `qz` zero angles, straight along the x axis
//! - `qn` nominal
//! - `qt` targeted
use crate::config::RobotDescription;
use crate::error::Result;
use crate::link::Link;
use crate::pose::{Pose, PoseSet};
use crate::robot::Robot;
use nalgebra::Vector3;
use std::f64::consts::{FRAC_PI_2, PI};

pub const NAME: &str = "Simple upright four link";

// link DH parameters
//                          alpha      A    D
const DH: [[f64; 3]; 4] = [
    [FRAC_PI_2, 0.0, 2.0],
    [0.0, 2.0, 0.0],
    [0.0, 2.0, 0.0],
    [0.0, 1.0, 0.0],
];

// link mass
const MASS: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

// link COG wrt link coordinate frame
//                           rx   ry   rz
const COG: [[f64; 3]; 4] = [
    [0.0, 0.0, 2.0],
    [2.0, 0.0, 0.0],
    [2.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
];

// link inertia about link COG
//                               Ixx  Iyy  Izz  Ixy  Iyz  Ixz
const INERTIA: [[f64; 6]; 4] = [
    [0.0, 0.0, 4.0, 0.0, 0.0, 0.0],
    [0.0, 4.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 2.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.5, 0.0, 0.0, 0.0, 0.0],
];

// actuator motor inertia (motor referred)
const MOTOR_INERTIA: [f64; 4] = [0.0, 0.0, 0.0, 0.0];

// actuator gear ratio
const GEAR_RATIO: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

// viscous and Coulomb friction are unknown and left at zero

pub const QZ: [f64; 4] = [0.0, 0.0, 0.0, 0.0];
pub const QN: [f64; 4] = [PI / 4.0, PI / 7.2, -PI / 7.2, PI / 18.0];
pub const QT: [f64; 4] = [0.0323078, 0.8323767, -1.3306788, -0.0075720];

pub fn robot() -> Result<Robot> {
    tracing::info!("Creating an upright four-link arm as fl3d");
    let mut links = Vec::with_capacity(DH.len());
    for (i, &[alpha, a, d]) in DH.iter().enumerate() {
        let link = Link::revolute(alpha, a, d)?
            .with_mass(MASS[i])?
            .with_cog(Vector3::from(COG[i]))?
            .with_inertia(&INERTIA[i])?
            .with_motor_inertia(MOTOR_INERTIA[i])?
            .with_gear_ratio(GEAR_RATIO[i])?;
        links.push(link);
    }

    let mut robot = Robot::new(links, NAME)?;
    robot.set_handle("p3D", 1.0)?;
    robot.set_handle("mag", 0.5)?;
    robot.set_plotopt("xlim", [-5.0, 5.0])?;
    robot.set_plotopt("ylim", [-5.0, 5.0])?;
    robot.set_plotopt("zlim", [0.0, 5.0])?;
    Ok(robot)
}

pub fn qz() -> Pose {
    Pose::new("qz", QZ.to_vec()).with_description("zero angles, straight along x-axis pose")
}

pub fn qn() -> Pose {
    Pose::new("qn", QN.to_vec()).with_description("nominal pose")
}

pub fn qt() -> Pose {
    Pose::new("qt", QT.to_vec()).with_description("targeted pose")
}

pub fn poses() -> Result<PoseSet> {
    PoseSet::try_from(vec![qz(), qn(), qt()])
}

pub fn description() -> Result<RobotDescription> {
    RobotDescription::new(robot()?, poses()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::JointType;
    use approx::assert_relative_eq;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn four_revolute_links() {
        let robot = robot().unwrap();
        assert_eq!(robot.name(), NAME);
        assert_eq!(robot.dof(), 4);
        assert_eq!(robot.config(), "RRRR");
        assert!(!robot.is_modified_dh());
        assert!(robot
            .links()
            .iter()
            .all(|link| link.joint_type() == JointType::Revolute));
    }

    #[test]
    fn link_parameters() {
        let robot = robot().unwrap();
        let first = robot.link(0).unwrap();
        assert_relative_eq!(first.alpha(), FRAC_PI_2);
        assert_relative_eq!(first.d(), 2.0);
        assert_relative_eq!(first.inertia()[(2, 2)], 4.0);
        assert_eq!(first.cog(), &Vector3::new(0.0, 0.0, 2.0));

        let last = robot.link(3).unwrap();
        assert_relative_eq!(last.a(), 1.0);
        assert_relative_eq!(last.inertia()[(1, 1)], 0.5);
        for link in robot.links() {
            assert_relative_eq!(link.mass(), 1.0);
            assert_relative_eq!(link.gear_ratio(), 1.0);
            assert_relative_eq!(link.motor_inertia(), 0.0);
            assert_relative_eq!(link.friction(1.0), 0.0);
        }
    }

    #[test]
    fn display_settings() {
        let robot = robot().unwrap();
        assert!(robot.handles().p3d);
        assert_relative_eq!(robot.handles().mag, 0.5);
        assert_eq!(robot.plot_options().xlim, Some([-5.0, 5.0]));
        assert_eq!(robot.plot_options().ylim, Some([-5.0, 5.0]));
        assert_eq!(robot.plot_options().zlim, Some([0.0, 5.0]));
    }

    #[test]
    fn named_poses() {
        let poses = poses().unwrap();
        assert_eq!(poses.names(), vec!["qz", "qn", "qt"]);
        let nominal = poses.get("qn").unwrap().joints();
        assert_relative_eq!(nominal[1], 25_f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(nominal[3], 10_f64.to_radians(), epsilon = 1e-12);
        assert!(poses.validate(4).is_ok());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn creation_notice_is_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || robot().unwrap());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("INFO"));
        assert!(output.contains("Creating an upright four-link arm as fl3d"));
    }
}
