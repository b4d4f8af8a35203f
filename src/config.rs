use crate::error::{Result, SoilCastError};
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub openweathermap: Option<OpenWeatherMapConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Default moisture alert threshold (fraction, 0.0-1.0)
    #[serde(default = "default_threshold")]
    pub moisture_threshold: f64,
}

fn default_threshold() -> f64 {
    0.30
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            moisture_threshold: default_threshold(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl OpenWeatherMapConfig {
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}

impl Config {
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(SoilCastError::Config(format!(
                "Config file not found at {:?}. Run `soilcast init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| SoilCastError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse YAML content, substituting `${VAR}` placeholders from the environment
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| SoilCastError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.analysis.moisture_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SoilCastError::Config(format!(
                "analysis.moisture_threshold must be a fraction between 0 and 1, got {}",
                threshold
            )));
        }

        if let Some(owm) = &self.openweathermap {
            if !(-90.0..=90.0).contains(&owm.latitude) || !(-180.0..=180.0).contains(&owm.longitude)
            {
                return Err(SoilCastError::Config(format!(
                    "Invalid OpenWeatherMap coordinates ({}, {})",
                    owm.latitude, owm.longitude
                )));
            }
        }

        Ok(())
    }

    /// OpenWeatherMap settings, if configured, enabled, and keyed
    pub fn weather(&self) -> Option<&OpenWeatherMapConfig> {
        self.openweathermap.as_ref().filter(|c| c.is_usable())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("SOILCAST_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/soilcast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SoilCastError::Config("Cannot determine config directory".into()))?
            .join("soilcast");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up SoilCast!");
        println!();

        println!("Analysis");
        let moisture_threshold: f64 = Input::new()
            .with_prompt("  Moisture alert threshold (0.0-1.0)")
            .default(default_threshold())
            .validate_with(|v: &f64| {
                if (0.0..=1.0).contains(v) {
                    Ok(())
                } else {
                    Err("threshold must be between 0 and 1")
                }
            })
            .interact_text()
            .map_err(|e| SoilCastError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- OpenWeatherMap (optional) ---
        println!("OpenWeatherMap (leave API key blank to skip)");
        let owm_api_key: String = Input::new()
            .with_prompt("  API key")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| SoilCastError::Config(format!("Input error: {}", e)))?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            let latitude: f64 = Input::new()
                .with_prompt("  Latitude")
                .default(52.23)
                .interact_text()
                .map_err(|e| SoilCastError::Config(format!("Input error: {}", e)))?;

            let longitude: f64 = Input::new()
                .with_prompt("  Longitude")
                .default(21.01)
                .interact_text()
                .map_err(|e| SoilCastError::Config(format!("Input error: {}", e)))?;

            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                latitude,
                longitude,
                enabled: true,
            })
        };

        println!();

        let config = Config {
            analysis: AnalysisConfig { moisture_threshold },
            openweathermap,
        };
        config.validate()?;

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| SoilCastError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# SoilCast Configuration\n# Generated by `soilcast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| SoilCastError::Config(format!("Invalid placeholder pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            match std::env::var(var_name) {
                Ok(value) => result = result.replace(placeholder, &value),
                Err(_) => tracing::warn!(var = var_name, "Config references unset variable"),
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("SOILCAST_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| SoilCastError::Config("Cannot determine data directory".into()))?
            .join("soilcast");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("soilcast.db"))
    }
}
