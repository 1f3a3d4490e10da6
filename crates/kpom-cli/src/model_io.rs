//! Reading edit models from disk and writing command output

use crate::errors::CliError;
use clap::ValueEnum;
use kpom_model::EditModel;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serialization of an edit model on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelFormat {
    Json,
    Toml,
    Yaml,
}

impl ModelFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(ModelFormat::Json),
            Some("toml") => Ok(ModelFormat::Toml),
            Some("yaml" | "yml") => Ok(ModelFormat::Yaml),
            _ => Err(CliError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

pub fn read_text(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load an edit model, choosing the format from the file extension
pub fn read_model(path: &Path) -> Result<EditModel, CliError> {
    let format = ModelFormat::from_path(path)?;
    let text = read_text(path)?;
    debug!("Reading {:?} edit model from {}", format, path.display());
    parse_model(&text, format, path)
}

pub fn parse_model(text: &str, format: ModelFormat, path: &Path) -> Result<EditModel, CliError> {
    let path = path.to_path_buf();
    match format {
        ModelFormat::Json => {
            serde_json::from_str(text).map_err(|source| CliError::Json { path, source })
        }
        ModelFormat::Toml => toml::from_str(text).map_err(|source| CliError::Toml { path, source }),
        ModelFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|source| CliError::Yaml { path, source })
        }
    }
}

pub fn format_model(model: &EditModel, format: ModelFormat) -> Result<String, CliError> {
    let text = match format {
        ModelFormat::Json => {
            serde_json::to_string_pretty(model).map_err(|e| CliError::Serialize(e.to_string()))?
        }
        ModelFormat::Toml => {
            toml::to_string_pretty(model).map_err(|e| CliError::Serialize(e.to_string()))?
        }
        ModelFormat::Yaml => {
            serde_yaml::to_string(model).map_err(|e| CliError::Serialize(e.to_string()))?
        }
    };
    Ok(if text.ends_with('\n') {
        text
    } else {
        format!("{text}\n")
    })
}

/// Write `content` to `path` through a sibling temp file, or to stdout when
/// no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    let Some(path) = path else {
        let mut stdout = io::stdout().lock();
        return stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|source| CliError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            });
    };

    let write_err = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, content).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::model_io::*;
    use kpom_model::Gav;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ModelFormat::from_path(Path::new("model.JSON")).ok(),
            Some(ModelFormat::Json)
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("model.yml")).ok(),
            Some(ModelFormat::Yaml)
        );
        assert!(matches!(
            ModelFormat::from_path(Path::new("model")),
            Err(CliError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_yaml_model() {
        let text = "name: Demo\ngav:\n  groupId: org.acme\n  artifactId: demo\n  version: '1.0'\n";
        let model = parse_model(text, ModelFormat::Yaml, Path::new("m.yaml"));
        assert!(model.as_ref().is_ok_and(|m| m.gav == Gav::new("org.acme", "demo", "1.0")));
        assert!(model.is_ok_and(|m| m.name == "Demo"));
    }

    #[test]
    fn test_toml_output_reads_back() {
        let model = EditModel::new(Gav::new("org.acme", "demo", "1.0")).with_name("Demo");
        let text = format_model(&model, ModelFormat::Toml).unwrap_or_default();
        let parsed = parse_model(&text, ModelFormat::Toml, Path::new("m.toml"));
        assert!(parsed.is_ok_and(|m| m == model));
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let err = parse_model("{", ModelFormat::Json, Path::new("broken.json"));
        assert!(err.is_err_and(|e| e.to_string().contains("broken.json")));
    }

    #[test]
    fn test_write_output_creates_parent_dirs() {
        let Ok(dir) = TempDir::new() else { return };
        let path = dir.path().join("out").join("pom.xml");
        assert!(write_output(Some(&path), "<project/>\n").is_ok());
        assert_eq!(fs::read_to_string(&path).unwrap_or_default(), "<project/>\n");
    }
}
