//! Inspector Configuration
//!
//! # Configuration Sources (in priority order, later wins)
//!
//! 1. Built-in defaults
//! 2. Config file: `--config <path>`, else `<config dir>/void_sdl/inspect.toml`
//! 3. Environment variables: `VOID_SDL_PATH` (search path of `.sdl`
//!    directories), `VOID_SDL_JSON=1`
//! 4. Command-line flags
//!
//! # Example Config File
//!
//! ```toml
//! sdl_dirs = ["/usr/share/void_sdl", "./sdl"]
//! show_types = true
//! json = false
//! output = "edited.bin"
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0}")]
    Usage(String),
}

/// Inspector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Directories searched for `.sdl` descriptor files
    pub sdl_dirs: Vec<PathBuf>,
    /// Print the Type column
    pub show_types: bool,
    /// Print JSON instead of an indented tree
    pub json: bool,
    /// Where to save the edited blob
    pub output: Option<PathBuf>,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            sdl_dirs: Vec::new(),
            show_types: true,
            json: false,
            output: None,
        }
    }
}

/// One `--set <rows>=<text>` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditArg {
    /// Rows from the root record, e.g. `[0, 1]` for `0/1`
    pub rows: Vec<usize>,
    pub text: String,
}

impl std::str::FromStr for EditArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, text) = s
            .split_once('=')
            .ok_or_else(|| format!("Expected <rows>=<text>, got '{}'", s))?;
        let rows = path
            .split('/')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.trim()
                    .parse()
                    .map_err(|_| format!("Invalid row '{}' in '{}'", part, path))
            })
            .collect::<Result<Vec<usize>, String>>()?;
        if rows.is_empty() {
            return Err(format!("Empty row path in '{}'", s));
        }
        Ok(Self {
            rows,
            text: text.to_string(),
        })
    }
}

/// Parsed command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub blob: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub sdl_dirs: Vec<PathBuf>,
    pub edits: Vec<EditArg>,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub no_types: bool,
    pub help: bool,
}

pub const USAGE: &str = "\
Usage: void_sdl_inspect <blob> [options]

Options:
    --sdl <dir>          Load .sdl descriptors from <dir> (repeatable)
    --set <rows>=<text>  Edit a value, rows separated by '/' (repeatable)
    --out <file>         Write the edited blob to <file>
    --json               Print the tree as JSON
    --no-types           Omit the Type column
    --config <file>      Read settings from <file>
    -h, --help           Show this help";

impl CliArgs {
    /// Parse arguments (without the program name)
    pub fn parse<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| ConfigError::Usage(format!("{} needs a value", flag)))
            };
            match arg.as_str() {
                "--sdl" => parsed.sdl_dirs.push(value("--sdl")?.into()),
                "--set" => parsed
                    .edits
                    .push(value("--set")?.parse().map_err(ConfigError::Usage)?),
                "--out" => parsed.output = Some(value("--out")?.into()),
                "--config" => parsed.config = Some(value("--config")?.into()),
                "--json" => parsed.json = true,
                "--no-types" => parsed.no_types = true,
                "-h" | "--help" => parsed.help = true,
                flag if flag.starts_with('-') => {
                    return Err(ConfigError::Usage(format!("Unknown option '{}'", flag)));
                }
                _ if parsed.blob.is_none() => parsed.blob = Some(PathBuf::from(&arg)),
                _ => return Err(ConfigError::Usage(format!("Unexpected argument '{}'", arg))),
            }
        }

        Ok(parsed)
    }
}

impl InspectConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("void_sdl");
            p.push("inspect.toml");
            p
        })
    }

    /// Load settings from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded inspector config from {:?}", path);
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(paths) = lookup("VOID_SDL_PATH") {
            let dirs: Vec<PathBuf> = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            log::debug!("Descriptor directories from env: {:?}", dirs);
            self.sdl_dirs.extend(dirs);
        }
        if let Some(json) = lookup("VOID_SDL_JSON") {
            self.json = matches!(json.to_str(), Some("1") | Some("true"));
        }
    }

    /// Apply command-line overrides
    pub fn apply_args(&mut self, args: &CliArgs) {
        self.sdl_dirs.extend(args.sdl_dirs.iter().cloned());
        if args.json {
            self.json = true;
        }
        if args.no_types {
            self.show_types = false;
        }
        if args.output.is_some() {
            self.output = args.output.clone();
        }
    }

    /// Merge every source
    pub fn resolve<F>(args: &CliArgs, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut config = match &args.config {
            // An explicit file must exist
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(lookup);
        config.apply_args(args);
        Ok(config)
    }
}
