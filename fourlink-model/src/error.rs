use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("robot needs at least one link")]
    EmptyChain,
    #[error("links mix standard and modified DH conventions")]
    MixedConvention,
    #[error("expected {expected} joint values, got {actual}")]
    JointCountMismatch { expected: usize, actual: usize },
    #[error("invalid link parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("inertia must have 6 or 9 elements, got {0}")]
    InertiaLength(usize),
    #[error("unknown display handle {0:?}")]
    UnknownHandle(String),
    #[error("unknown plot option {0:?}")]
    UnknownPlotOption(String),
    #[error("unknown pose {0:?}")]
    UnknownPose(String),
    #[error("pose {0:?} already defined")]
    DuplicatePose(String),
    #[error("no built in model named {0:?}")]
    UnknownModel(String),
    #[error("dynamics requires standard DH parameters")]
    ModifiedDhDynamics,
    #[error("joint space inertia matrix is singular")]
    SingularInertia,
    #[error("unsupported model file extension {0:?}")]
    UnsupportedFormat(String),
    #[error("error while accessing model file")]
    IoError(#[from] std::io::Error),
    #[error("error while parsing json")]
    JsonError(#[from] serde_json::Error),
    #[error("error while parsing yaml")]
    YamlError(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::InvalidParameter {
            name,
            reason: format!("{} is not finite", value),
        })
    }
}

pub(crate) fn check_joint_count(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::JointCountMismatch { expected, actual })
    }
}
