#![doc = include_str!("../../README.md")]

pub mod config;
pub mod dynamics;
pub mod error;
pub mod kinematics;
pub mod link;
pub mod models;
pub mod motion;
pub mod pose;
pub mod robot;

pub use config::{ModelFormat, RobotDescription};
pub use error::{ModelError, Result};
pub use link::{Convention, JointType, Link};
pub use motion::JointMotion;
pub use pose::{Pose, PoseSet};
pub use robot::Robot;
