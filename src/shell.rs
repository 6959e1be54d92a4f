use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};

/// Shell type for PATH registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Fish,
}

impl Shell {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "zsh" => Some(Shell::Zsh),
            "bash" => Some(Shell::Bash),
            "fish" => Some(Shell::Fish),
            _ => None,
        }
    }

    /// Detect the shell from `$SHELL` (e.g. `/bin/zsh` -> `Zsh`).
    pub fn detect() -> Option<Self> {
        let shell = env::var("SHELL").ok()?;
        let name = Path::new(&shell).file_name()?.to_str()?;
        Self::from_name(name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shell::Zsh => "zsh",
            Shell::Bash => "bash",
            Shell::Fish => "fish",
        }
    }

    /// Startup file that receives the PATH export line.
    pub fn profile_path(self, home: &Path) -> PathBuf {
        match self {
            Shell::Zsh => home.join(".zshenv"),
            Shell::Bash => home.join(".bashrc"),
            Shell::Fish => home.join(".config/fish/config.fish"),
        }
    }

    /// Line that puts `bin_dir` on PATH for this shell.
    pub fn export_line(self, bin_dir: &Path) -> String {
        match self {
            Shell::Zsh | Shell::Bash => {
                format!("export PATH=\"{}:$PATH\"", bin_dir.display())
            }
            Shell::Fish => format!("fish_add_path {}", bin_dir.display()),
        }
    }
}

/// Whether `dir` is already a segment of the current `PATH`.
///
/// Compares whole segments via `env::split_paths` rather than substring
/// containment, so `/opt/x/.local/bin` never matches `~/.local/bin`.
pub fn path_contains(dir: &Path) -> Result<bool> {
    let path = match env::var_os("PATH") {
        Some(path) => path,
        None => return Ok(false),
    };

    Ok(env::split_paths(&path).any(|segment| segment == dir))
}
