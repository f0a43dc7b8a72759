/// Open models and selection parsing
use objview_core::error::ObjResult;
use objview_core::obj::{load_obj, save_obj};
use objview_core::{Model, Vector3};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by prompt commands
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid index `{0}`")]
    InvalidIndex(String),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("no document is open")]
    NoDocument,

    #[error(transparent)]
    Obj(#[from] objview_core::ObjError),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// A model opened in the viewer
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub path: Option<PathBuf>,
    pub model: Model,
    pub visible: bool,
}

impl Document {
    pub fn new(name: impl Into<String>, model: Model) -> Self {
        Self {
            name: name.into(),
            path: None,
            model,
            visible: true,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> ObjResult<Self> {
        let path = path.as_ref();
        let model = load_obj(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            model,
            visible: true,
        })
    }

    /// Save to `path`, which becomes the document's path
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> ObjResult<()> {
        save_obj(&self.model, path.as_ref())?;
        self.path = Some(path.as_ref().to_path_buf());
        Ok(())
    }
}

/// Parse a comma-separated list of zero-based positions.
///
/// Blank input yields an empty set; duplicates collapse.
pub fn parse_index_list(text: &str) -> CommandResult<HashSet<usize>> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| CommandError::InvalidIndex(token.to_string()))
        })
        .collect()
}

/// Parse exactly three finite numbers separated by spaces or commas.
pub fn parse_vector3(command: &'static str, text: &str) -> CommandResult<Vector3> {
    let values = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(CommandError::InvalidNumber(token.to_string())),
        })
        .collect::<CommandResult<Vec<f64>>>()?;

    match values[..] {
        [x, y, z] => Ok(Vector3::new(x, y, z)),
        _ => Err(CommandError::MissingArgument {
            command,
            argument: "three numbers",
        }),
    }
}
