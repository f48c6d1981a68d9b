pub mod logging;

use fourlink_model::{models, ModelError, Result, RobotDescription};
use std::path::Path;

/// Model file when given, the built in upright four-link arm otherwise
pub fn load_description(model: Option<&Path>) -> Result<RobotDescription> {
    match model {
        Some(path) => RobotDescription::load(path),
        None => models::builtin("fl3d"),
    }
}

/// Joint values picked on the command line.
///
/// A named pose wins over explicit values. With neither the zero
/// configuration is used.
pub fn select_joints(
    description: &RobotDescription,
    pose: Option<&str>,
    joints: &[f64],
) -> Result<Vec<f64>> {
    let dof = description.robot.dof();
    if let Some(name) = pose {
        return Ok(description.poses.get(name)?.joints().to_vec());
    }
    if joints.is_empty() {
        return Ok(vec![0.0; dof]);
    }
    if joints.len() != dof {
        return Err(ModelError::JointCountMismatch {
            expected: dof,
            actual: joints.len(),
        });
    }
    Ok(joints.to_vec())
}
