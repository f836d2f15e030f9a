use std::path::{Path, PathBuf};
use std::io::ErrorKind;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{self, Context};
use crate::formatting::OutputFormat;

pub const ACCESS_TOKEN_ENV: &str = "SECMAN_ACCESS_TOKEN";

/// contents of the optional config file. every field can be overridden from
/// the command line.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Root {
    pub project: Option<String>,
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub format: Option<OutputFormat>,

    /// request timeout in seconds
    pub timeout: Option<u64>,
}

pub fn resolve_path<B>(path: PathBuf, base: B) -> error::Result<PathBuf>
where
    B: AsRef<Path>,
{
    let resolve = if path.is_absolute() {
        path
    } else {
        base.as_ref().join(path)
    };

    match resolve.canonicalize() {
        Ok(p) => Ok(p),
        Err(err) => match err.kind() {
            ErrorKind::NotFound => Err(error::Error::new()
                .context(format!("config file not found ({})", resolve.display()))),
            _ => Err(error::Error::new()
                .context(format!("io error when attempting to resolve config file ({})", resolve.display()))
                .source(err))
        }
    }
}

pub fn load(path: PathBuf) -> error::Result<Root> {
    let cwd = std::env::current_dir()
        .context("failed to retrieve cwd")?;
    let config_path = resolve_path(path, &cwd)?;

    let Some(ext) = config_path.extension() else {
        return Err(error::Error::new()
            .context("failed to retrieve the file extension of the config file"));
    };

    let ext = ext.to_ascii_lowercase();
    let file = std::fs::OpenOptions::new()
        .read(true)
        .open(&config_path)
        .context("failed to open the specified config file")?;
    let reader = std::io::BufReader::new(file);

    let root = if ext.eq("yaml") || ext.eq("yml") {
        serde_yaml::from_reader(reader)
            .context("there was an error when attempting to parse the yaml config file")?
    } else if ext.eq("json") {
        serde_json::from_reader(reader)
            .context("there was an error when attempting to parse the json config file")?
    } else {
        return Err(error::Error::new()
            .context("the specified config type is not yaml or json"));
    };

    Ok(root)
}

/// values provided on the command line or through the environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub project: Option<String>,
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub format: Option<OutputFormat>,
}

/// final settings after applying overrides on top of the config file
#[derive(Debug)]
pub struct Settings {
    pub project: Option<String>,
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub format: OutputFormat,
    pub timeout: Option<Duration>,
}

impl Settings {
    pub fn merge(file: Root, overrides: Overrides) -> Settings {
        Settings {
            project: overrides.project.or(file.project),
            endpoint: overrides.endpoint.or(file.endpoint),
            access_token: overrides.access_token.or(file.access_token),
            format: overrides.format.or(file.format).unwrap_or_default(),
            timeout: file.timeout.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_yaml() {
        let file = write_config(".yaml", "project: my-project\nformat: json\ntimeout: 30\n");
        let root = load(file.path().to_owned()).unwrap();

        assert_eq!(root.project.as_deref(), Some("my-project"));
        assert_eq!(root.format, Some(OutputFormat::Json));
        assert_eq!(root.timeout, Some(30));
    }

    #[test]
    fn load_json() {
        let file = write_config(".json", r#"{"endpoint": "http://localhost:9000/"}"#);
        let root = load(file.path().to_owned()).unwrap();

        assert_eq!(root.endpoint.as_deref(), Some("http://localhost:9000/"));
    }

    #[test]
    fn load_unknown_extension() {
        let file = write_config(".toml", "project = \"p\"");

        assert!(load(file.path().to_owned()).is_err());
    }

    #[test]
    fn load_unknown_field() {
        let file = write_config(".yaml", "projcet: typo\n");

        assert!(load(file.path().to_owned()).is_err());
    }

    #[test]
    fn overrides_take_priority() {
        let file = Root {
            project: Some("from-file".into()),
            endpoint: Some("http://file/".into()),
            access_token: Some("file-token".into()),
            format: Some(OutputFormat::Json),
            timeout: Some(5),
        };
        let overrides = Overrides {
            project: Some("from-flag".into()),
            format: Some(OutputFormat::Table),
            ..Default::default()
        };

        let settings = Settings::merge(file, overrides);

        assert_eq!(settings.project.as_deref(), Some("from-flag"));
        assert_eq!(settings.endpoint.as_deref(), Some("http://file/"));
        assert_eq!(settings.access_token.as_deref(), Some("file-token"));
        assert_eq!(settings.format, OutputFormat::Table);
        assert_eq!(settings.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn defaults_without_file() {
        let settings = Settings::merge(Root::default(), Overrides::default());

        assert_eq!(settings.format, OutputFormat::Yaml);
        assert!(settings.project.is_none());
    }
}
