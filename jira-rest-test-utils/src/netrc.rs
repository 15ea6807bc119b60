//! Temporary `.netrc` files for credential lookup tests
//!
//! Code under test receives the home directory explicitly; `HOME` is never
//! modified.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary home directory, optionally holding a `.netrc` file
pub struct NetrcFixture {
  temp_dir: TempDir,
  netrc_path: PathBuf,
}

impl NetrcFixture {
  /// Create a home directory whose `.netrc` holds `content`
  pub fn new(content: &str) -> Self {
    let fixture = Self::empty_home();
    fs::write(&fixture.netrc_path, content).expect("Failed to write test .netrc");
    fixture
  }

  /// Create a home directory without a `.netrc` file
  pub fn empty_home() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");
    Self { temp_dir, netrc_path }
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary home directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }
}
