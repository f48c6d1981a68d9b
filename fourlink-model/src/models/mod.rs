//! Robots shipped with the crate
pub mod fourlink3d;

use crate::config::RobotDescription;
use crate::error::{ModelError, Result};

/// Names accepted by [`builtin`]
pub const BUILTIN_MODELS: [&str; 1] = ["fl3d"];

/// Built in model by its short name
pub fn builtin(name: &str) -> Result<RobotDescription> {
    match name {
        "fl3d" | "fourlink3d" => fourlink3d::description(),
        other => Err(ModelError::UnknownModel(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_by_name() {
        for name in BUILTIN_MODELS {
            assert!(builtin(name).is_ok());
        }
        assert!(matches!(
            builtin("puma560"),
            Err(ModelError::UnknownModel(_))
        ));
    }
}
