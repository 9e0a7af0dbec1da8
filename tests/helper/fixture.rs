//! On-disk recipe tree fixtures

use std::fs;
use std::path::{Path, PathBuf};

use check_conan_info::cli::Cli;
use clap::Parser;
use tempfile::TempDir;

/// Temporary tree laid out as `<base>/<package>/<version>/data.path`,
/// with each pointer referencing a conandata.yml stored outside the base directory
pub struct RecipeTree {
    temp_dir: TempDir,
}

impl RecipeTree {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("temp-ver")).unwrap();
        Self { temp_dir }
    }

    /// Directory passed as `--dir`
    pub fn base_dir(&self) -> PathBuf {
        self.temp_dir.path().join("temp-ver")
    }

    /// Add a package whose version directory points at a conandata.yml with `conandata`
    pub fn with_package(self, package: &str, version: &str, conandata: &str) -> Self {
        let metadata = self
            .temp_dir
            .path()
            .join("recipes")
            .join(package)
            .join(version)
            .join("conandata.yml");
        fs::create_dir_all(metadata.parent().unwrap()).unwrap();
        fs::write(&metadata, conandata).unwrap();

        self.with_pointer(package, version, &format!("{}\n", metadata.display()))
    }

    /// Add a version directory whose data.path holds `content` verbatim
    pub fn with_pointer(self, package: &str, version: &str, content: &str) -> Self {
        let version_dir = self.base_dir().join(package).join(version);
        fs::create_dir_all(&version_dir).unwrap();
        fs::write(version_dir.join("data.path"), content).unwrap();
        self
    }

    /// Add a package directory without any version directory
    pub fn with_empty_package(self, package: &str) -> Self {
        fs::create_dir_all(self.base_dir().join(package)).unwrap();
        self
    }

    /// Add a plain file at `relative` inside the base directory
    pub fn with_file(self, relative: &str) -> Self {
        let path = self.base_dir().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
        self
    }
}

/// conandata.yml content with a single version and scalar url
pub fn conandata(version: &str, url: &str) -> String {
    format!("sources:\n  \"{version}\":\n    url: \"{url}\"\n    sha256: \"0000\"\n")
}

/// Parse `args` like the binary does and return everything written to stdout
pub fn run_cli(args: &[&str], dir: &Path) -> String {
    let dir = dir.display().to_string();
    let argv = std::iter::once("check-conan-info")
        .chain(args.iter().copied())
        .chain(["--dir", dir.as_str()]);
    let cli = Cli::try_parse_from(argv).unwrap();

    let mut out = Vec::new();
    cli.command.run(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}
