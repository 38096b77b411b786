use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Structure representing the application configuration. Contains pathing and run information
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub graw_path: PathBuf,
    pub hit_path: PathBuf,
    pub first_run_number: i32,
    pub last_run_number: i32,
    pub n_threads: i32,
    /// If true, frames that fail to decode are logged and dropped. If false, the run is aborted
    #[serde(default = "default_skip_bad_frames")]
    pub skip_bad_frames: bool,
}

fn default_skip_bad_frames() -> bool {
    true
}

impl Default for Config {
    /// Generate a new Config object. All paths will be invalid
    fn default() -> Self {
        Self {
            graw_path: PathBuf::from("None"),
            hit_path: PathBuf::from("None"),
            first_run_number: 0,
            last_run_number: 0,
            n_threads: 1,
            skip_bad_frames: default_skip_bad_frames(),
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Self::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str::<Self>(yaml_str)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check if a specific run exists by evaluating the existance of GET DAQ data
    pub fn does_run_exist(&self, run_number: i32) -> bool {
        self.graw_path.join(self.get_run_str(run_number)).exists()
    }

    /// Get the Path to the directory holding the .graw files of a run
    pub fn get_run_directory(&self, run_number: i32) -> Result<PathBuf, ConfigError> {
        let run_dir: PathBuf = self.graw_path.join(self.get_run_str(run_number));
        if run_dir.exists() {
            Ok(run_dir)
        } else {
            Err(ConfigError::BadFilePath(run_dir))
        }
    }

    /// Get the path to the output hit file
    pub fn get_hit_file_name(&self, run_number: i32) -> Result<PathBuf, ConfigError> {
        let hit_file_path: PathBuf = self
            .hit_path
            .join(format!("{}.hits", self.get_run_str(run_number)));
        if self.hit_path.exists() {
            Ok(hit_file_path)
        } else {
            Err(ConfigError::BadFilePath(self.hit_path.clone()))
        }
    }

    /// Construct the run string using the AT-TPC DAQ format
    fn get_run_str(&self, run_number: i32) -> String {
        format!("run_{run_number:0>4}")
    }

    pub fn is_n_threads_valid(&self) -> bool {
        self.n_threads >= 1
    }
}
