use crate::error::{check_finite, check_joint_count, ModelError, Result};
use serde::{Deserialize, Serialize};

/// Named joint configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pose {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    joints: Vec<f64>,
}

impl Pose {
    pub fn new(name: impl Into<String>, joints: Vec<f64>) -> Pose {
        Pose {
            name: name.into(),
            description: None,
            joints,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Pose {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn joints(&self) -> &[f64] {
        &self.joints
    }

    pub fn dof(&self) -> usize {
        self.joints.len()
    }
}

/// Ordered poses with unique names
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct PoseSet {
    poses: Vec<Pose>,
}

impl PoseSet {
    pub fn new() -> PoseSet {
        PoseSet::default()
    }

    pub fn insert(&mut self, pose: Pose) -> Result<()> {
        if self.poses.iter().any(|existing| existing.name == pose.name) {
            return Err(ModelError::DuplicatePose(pose.name));
        }
        self.poses.push(pose);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Pose> {
        self.poses
            .iter()
            .find(|pose| pose.name == name)
            .ok_or_else(|| ModelError::UnknownPose(name.to_owned()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.poses.iter().map(|pose| pose.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.poses.iter()
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Every pose must have one finite value per joint and no name twice
    pub fn validate(&self, dof: usize) -> Result<()> {
        for (index, pose) in self.poses.iter().enumerate() {
            check_joint_count(dof, pose.dof())?;
            for value in pose.joints() {
                check_finite("joints", *value)?;
            }
            if self.poses[..index].iter().any(|other| other.name == pose.name) {
                return Err(ModelError::DuplicatePose(pose.name.clone()));
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<Pose>> for PoseSet {
    type Error = ModelError;

    fn try_from(poses: Vec<Pose>) -> Result<Self> {
        let mut set = PoseSet::new();
        for pose in poses {
            set.insert(pose)?;
        }
        Ok(set)
    }
}
