use std::io;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::param::Params;

/// Settings file read from the working directory when no path is given.
pub const DEFAULT_FILE: &str = "milp-primer.toml";

/// Prefix of environment overrides, e.g. `MILP_PRIMER_SOLVER__INT_TOLERANCE=1e-4`.
pub const ENV_PREFIX: &str = "MILP_PRIMER_";

/// Runtime settings of the example runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub solver: Params,
    pub output: OutputSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Print each model in LP format before its result.
    pub show_model: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directives, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            filter: "warn".to_string(),
        }
    }
}

/// Command-line overrides, merged after every other source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub format: Option<OutputFormat>,
    pub show_model: Option<bool>,
    pub int_tolerance: Option<f64>,
}

impl Overrides {
    pub fn merge_into(&self, mut figment: Figment) -> Figment {
        if let Some(format) = self.format {
            figment = figment.merge(Serialized::default("output.format", format));
        }
        if let Some(show_model) = self.show_model {
            figment = figment.merge(Serialized::default("output.show_model", show_model));
        }
        if let Some(tolerance) = self.int_tolerance {
            figment = figment.merge(Serialized::default("solver.int_tolerance", tolerance));
        }
        figment
    }
}

impl Settings {
    /// Built-in defaults as a figment, the base every other source merges onto.
    pub fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    /// Defaults, then the settings file, then `MILP_PRIMER_*` environment variables.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn figment(path: Option<&Path>) -> Result<Figment, Error> {
        let file = match path {
            Some(path) if !path.exists() => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("settings file {} not found", path.display()),
                )));
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_FILE),
        };
        Ok(Self::defaults()
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        Self::extract(Self::figment(path)?)
    }

    /// [`Settings::load`] with command-line overrides on top.
    pub fn load_with(path: Option<&Path>, overrides: &Overrides) -> Result<Self, Error> {
        Self::extract(overrides.merge_into(Self::figment(path)?))
    }

    pub fn extract(figment: Figment) -> Result<Self, Error> {
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_round_trip_through_figment() {
        let settings = Settings::extract(Settings::defaults()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.output.format, OutputFormat::Text);
        assert_eq!(settings.log.filter, "warn");
    }

    #[test]
    fn toml_overrides_nested_keys() {
        let figment = Settings::defaults().merge(Toml::string(
            r#"
            [solver]
            int_tolerance = 1e-4

            [output]
            format = "json"
            "#,
        ));
        let settings = Settings::extract(figment).unwrap();
        assert_eq!(settings.solver.int_tolerance, 1e-4);
        assert!(settings.solver.tighten_integral_objective);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert!(!settings.output.show_model);
    }

    #[test]
    fn invalid_value_is_a_config_error() {
        let figment = Settings::defaults().merge(Toml::string(
            r#"
            [output]
            format = "yaml"
            "#,
        ));
        let err = Settings::extract(figment).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn environment_overrides_file_and_cli_overrides_both() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_FILE,
                r#"
                [solver]
                int_tolerance = 1e-4
                tighten_integral_objective = false

                [log]
                filter = "debug"
                "#,
            )?;
            jail.set_env("MILP_PRIMER_SOLVER__INT_TOLERANCE", "0.001");
            jail.set_env("MILP_PRIMER_OUTPUT__FORMAT", "json");

            let settings = Settings::load(None).map_err(|e| e.to_string())?;
            assert_eq!(settings.solver.int_tolerance, 0.001);
            assert!(!settings.solver.tighten_integral_objective);
            assert_eq!(settings.output.format, OutputFormat::Json);
            assert_eq!(settings.log.filter, "debug");

            let overrides = Overrides {
                format: Some(OutputFormat::Text),
                show_model: Some(true),
                int_tolerance: Some(0.01),
            };
            let settings = Settings::load_with(None, &overrides).map_err(|e| e.to_string())?;
            assert_eq!(settings.solver.int_tolerance, 0.01);
            assert_eq!(settings.output.format, OutputFormat::Text);
            assert!(settings.output.show_model);
            assert!(!settings.solver.tighten_integral_objective);
            Ok(())
        });
    }

    #[test]
    fn explicit_file_is_read() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[output]\nshow_model = true\n")?;
            let settings =
                Settings::load(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            assert!(settings.output.show_model);
            assert_eq!(settings.solver, Params::default());
            Ok(())
        });
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let figment = Overrides::default().merge_into(Settings::defaults());
        assert_eq!(Settings::extract(figment).unwrap(), Settings::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Settings::load(Some(Path::new("no/such/milp-primer.toml"))).unwrap_err();
        assert!(matches!(err, Error::Io(e) if e.kind() == io::ErrorKind::NotFound));
    }
}
