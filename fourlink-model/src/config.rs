use crate::error::{ModelError, Result};
use crate::pose::PoseSet;
use crate::robot::Robot;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

lazy_static! {
    static ref INCLUDED: RobotDescription = {
        let json = include_str!("../config/fourlink3d.json");
        RobotDescription::parse_json(json).expect("included model description is valid")
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Yaml,
}

impl ModelFormat {
    /// Format from the file extension
    pub fn from_path(path: &Path) -> Result<ModelFormat> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(ModelFormat::Json),
            "yaml" | "yml" => Ok(ModelFormat::Yaml),
            _ => Err(ModelError::UnsupportedFormat(extension)),
        }
    }
}

/// Robot together with its named poses, as stored on disk
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RobotDescription {
    pub robot: Robot,
    #[serde(default)]
    pub poses: PoseSet,
}

impl RobotDescription {
    pub fn new(robot: Robot, poses: PoseSet) -> Result<RobotDescription> {
        let description = RobotDescription { robot, poses };
        description.validate()?;
        Ok(description)
    }

    pub fn validate(&self) -> Result<()> {
        self.robot.validate()?;
        self.poses.validate(self.robot.dof())
    }

    /// The upright four-link arm is packaged with the library.
    ///
    /// This method retrieves the included version
    pub fn included() -> RobotDescription {
        INCLUDED.clone()
    }

    pub fn parse_json(text: &str) -> Result<RobotDescription> {
        let description: RobotDescription = serde_json::from_str(text)?;
        description.validate()?;
        Ok(description)
    }

    pub fn parse_yaml(text: &str) -> Result<RobotDescription> {
        let description: RobotDescription = serde_yaml::from_str(text)?;
        description.validate()?;
        Ok(description)
    }

    pub fn serialize_to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    pub fn serialize_to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(yaml)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.serialize_to_json()?)?;
        tracing::debug!("Saved {} to {}", self.robot.name(), path.as_ref().display());
        Ok(())
    }

    pub fn save_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.serialize_to_yaml()?)?;
        tracing::debug!("Saved {} to {}", self.robot.name(), path.as_ref().display());
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<RobotDescription> {
        let text = fs::read_to_string(path.as_ref())?;
        let description = RobotDescription::parse_json(&text)?;
        tracing::debug!(
            "Loaded {} from {}",
            description.robot.name(),
            path.as_ref().display()
        );
        Ok(description)
    }

    pub fn load_yaml(path: impl AsRef<Path>) -> Result<RobotDescription> {
        let text = fs::read_to_string(path.as_ref())?;
        let description = RobotDescription::parse_yaml(&text)?;
        tracing::debug!(
            "Loaded {} from {}",
            description.robot.name(),
            path.as_ref().display()
        );
        Ok(description)
    }

    /// Picks json or yaml by extension
    pub fn load(path: impl AsRef<Path>) -> Result<RobotDescription> {
        match ModelFormat::from_path(path.as_ref())? {
            ModelFormat::Json => RobotDescription::load_json(path),
            ModelFormat::Yaml => RobotDescription::load_yaml(path),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>, format: ModelFormat) -> Result<()> {
        match format {
            ModelFormat::Json => self.save_json(path),
            ModelFormat::Yaml => self.save_yaml(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Link;
    use crate::models::fourlink3d;
    use crate::pose::Pose;

    const MINIMAL_JSON: &str = r#"{"robot":{"name":"stick","links":[{"alpha":0.0,"a":1.0,"d":0.0}]}}"#;

    #[test]
    fn check_included() {
        let _ = RobotDescription::included();
    }

    #[test]
    fn included_matches_parameter_table() {
        let included = RobotDescription::included();
        let built = fourlink3d::description().unwrap();
        assert_eq!(included, built);
    }

    #[test]
    fn parse_minimal_json() {
        let description = RobotDescription::parse_json(MINIMAL_JSON).unwrap();
        let expected = Robot::new(vec![Link::revolute(0.0, 1.0, 0.0).unwrap()], "stick").unwrap();
        assert_eq!(description.robot, expected);
        assert!(description.poses.is_empty());
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "robot:\n  name: stick\n  links:\n    - alpha: 0.0\n      a: 1.0\n      d: 0.0\n";
        let description = RobotDescription::parse_yaml(yaml).unwrap();
        assert_eq!(description, RobotDescription::parse_json(MINIMAL_JSON).unwrap());
    }

    #[test]
    fn serialize_to_json() {
        let description = RobotDescription::included();
        let json = description.serialize_to_json().unwrap();
        let parsed = RobotDescription::parse_json(&json).unwrap();
        assert_eq!(description, parsed);
    }

    #[test]
    fn serialize_to_yaml() {
        let description = RobotDescription::included();
        let yaml = description.serialize_to_yaml().unwrap();
        let parsed = RobotDescription::parse_yaml(&yaml).unwrap();
        assert_eq!(description, parsed);
    }

    #[test]
    fn rejects_invalid_documents() {
        let empty = r#"{"robot":{"name":"empty","links":[]}}"#;
        assert!(matches!(
            RobotDescription::parse_json(empty),
            Err(ModelError::EmptyChain)
        ));
        let negative_mass =
            r#"{"robot":{"name":"heavy","links":[{"alpha":0.0,"a":1.0,"d":0.0,"mass":-1.0}]}}"#;
        assert!(RobotDescription::parse_json(negative_mass).is_err());
        let short_pose = r#"{"robot":{"name":"stick","links":[{"alpha":0.0,"a":1.0,"d":0.0}]},"poses":[{"name":"p","joints":[0.0,1.0]}]}"#;
        assert!(matches!(
            RobotDescription::parse_json(short_pose),
            Err(ModelError::JointCountMismatch { .. })
        ));
        assert!(matches!(
            RobotDescription::parse_json("{"),
            Err(ModelError::JsonError(_))
        ));

        let stick = "robot:\n  name: stick\n  links:\n    - {alpha: 0.0, a: 1.0, d: 0.0}\n";
        let nan_pose = format!(
            "{}poses:\n  - {{name: a, joints: [0.0]}}\n  - {{name: b, joints: [.nan]}}\n",
            stick
        );
        assert!(matches!(
            RobotDescription::parse_yaml(&nan_pose),
            Err(ModelError::InvalidParameter { name: "joints", .. })
        ));
        let reversed_limits = format!("{}  plot_options:\n    xlim: [5.0, -5.0]\n", stick);
        assert!(matches!(
            RobotDescription::parse_yaml(&reversed_limits),
            Err(ModelError::InvalidParameter { name: "xlim", .. })
        ));
        let nan_scale = format!("{}  handles:\n    p3d: true\n    mag: .nan\n", stick);
        assert!(matches!(
            RobotDescription::parse_yaml(&nan_scale),
            Err(ModelError::InvalidParameter { name: "mag", .. })
        ));
    }

    #[test]
    fn new_checks_poses() {
        let robot = Robot::new(vec![Link::revolute(0.0, 1.0, 0.0).unwrap()], "stick").unwrap();
        let poses = PoseSet::try_from(vec![Pose::new("bent", vec![0.0, 1.0])]).unwrap();
        assert!(RobotDescription::new(robot, poses).is_err());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ModelFormat::from_path(Path::new("arm.json")).unwrap(),
            ModelFormat::Json
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("arm.YML")).unwrap(),
            ModelFormat::Yaml
        );
        assert!(matches!(
            ModelFormat::from_path(Path::new("arm.toml")),
            Err(ModelError::UnsupportedFormat(_))
        ));
        assert!(ModelFormat::from_path(Path::new("arm")).is_err());
    }

    #[test]
    fn save_and_load_files() {
        let directory = std::env::temp_dir();
        let description = RobotDescription::included();
        for (name, format) in [
            ("fourlink_model_test.json", ModelFormat::Json),
            ("fourlink_model_test.yaml", ModelFormat::Yaml),
        ] {
            let path = directory.join(name);
            description.save(&path, format).unwrap();
            let loaded = RobotDescription::load(&path).unwrap();
            assert_eq!(description, loaded);
            let _ = fs::remove_file(&path);
        }
    }
}
