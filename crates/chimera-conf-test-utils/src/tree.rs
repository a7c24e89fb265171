use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory of config files, removed on drop.
pub struct ConfigTree {
    temp: TempDir,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("tempdir"),
        }
    }

    /// Root the files are written under.
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Absolute path of a file in the tree.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// Write contents to a relative path, creating parent directories.
    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create config dir");
        }
        fs::write(&path, contents).expect("write config");
        path
    }

    /// Write contents and return `self` for chaining fixture setup.
    pub fn with(self, relative: impl AsRef<Path>, contents: &str) -> Self {
        self.write(relative, contents);
        self
    }

    /// Delete a file from the tree.
    pub fn remove(&self, relative: impl AsRef<Path>) {
        fs::remove_file(self.path(relative)).expect("remove config");
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}
