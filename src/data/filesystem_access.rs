//! Directories searched for the `poke` config: the user's config directory and
//! the current directory.

use std::path::PathBuf;

const APP_DIR: &str = "poke";

#[derive(Debug, Clone, Copy)]
pub enum FsAccess {
    Config,
    Current,
}

impl FsAccess {
    /// The `poke` directory under this base, without creating it.
    ///
    /// Examples:
    /// `~/.config/poke`, `./poke`.
    fn app_dir(&self) -> anyhow::Result<PathBuf> {
        let base_path = match self {
            FsAccess::Config => dirs::config_dir(),
            FsAccess::Current => std::env::current_dir().ok(),
        };

        let mut path = base_path.ok_or_else(|| {
            anyhow::anyhow!("Unsupported operating system. Supported OS: Linux, MacOS, Windows.")
        })?;
        path.push(APP_DIR);
        Ok(path)
    }

    /// Path of `file` inside the `poke` directory, if that file exists.
    pub fn existing_file(&self, file: &str) -> Option<PathBuf> {
        let path = self.app_dir().ok()?.join(file);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_dir_is_under_the_base() {
        let app = FsAccess::Current.app_dir().unwrap();
        assert_eq!(app, std::env::current_dir().unwrap().join("poke"));
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(FsAccess::Current.existing_file("definitely-not-here.json").is_none());
        assert!(FsAccess::Config.existing_file("definitely-not-here.json").is_none());
    }
}
