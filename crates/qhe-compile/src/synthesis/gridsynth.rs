//! Subprocess adapter for the `gridsynth` binary (Ross–Selinger).

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::trace;

use crate::error::{CompileError, CompileResult};
use crate::synthesis::oracle::RotationOracle;

/// Notice shown before downloading the binary.
pub const LICENSE_NOTICE: &str =
    "This binary is licensed under GPL-3.0 and is not part of this software.";

/// File name of the binary on this platform.
pub fn binary_name() -> &'static str {
    if cfg!(windows) {
        "gridsynth.exe"
    } else {
        "gridsynth"
    }
}

/// Directory the binary is installed into: `~/.cqc_qhe/bin`.
pub fn install_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".cqc_qhe")
        .join("bin")
}

/// Full path of the installed binary.
pub fn default_binary_path() -> PathBuf {
    install_dir().join(binary_name())
}

/// Download location of the prebuilt binary for this platform.
pub fn download_url() -> &'static str {
    if cfg!(windows) {
        "https://www.mathstat.dal.ca/~selinger/newsynth/downloads/win/gridsynth.exe"
    } else if cfg!(target_os = "macos") {
        "https://www.mathstat.dal.ca/~selinger/newsynth/downloads/mac/gridsynth"
    } else {
        "https://www.mathstat.dal.ca/~selinger/newsynth/downloads/lin/gridsynth"
    }
}

/// `gridsynth` invoked as a blocking subprocess, once per angle.
#[derive(Debug, Clone)]
pub struct GridsynthOracle {
    path: PathBuf,
}

impl GridsynthOracle {
    /// Use the binary at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the binary.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Command-line arguments for one synthesis request.
    ///
    /// `-p` asks for a result up to global phase, so the output never
    /// contains the `W` phase symbol.
    pub fn args(angle: f64, tolerance: Option<f64>, seed: Option<u64>) -> Vec<String> {
        let mut args = vec![format!("({angle})"), "-p".to_string()];
        if let Some(eps) = tolerance {
            args.push("-e".to_string());
            args.push(eps.to_string());
        }
        if let Some(seed) = seed {
            args.push("-r".to_string());
            args.push(seed.to_string());
        }
        args
    }
}

impl RotationOracle for GridsynthOracle {
    fn name(&self) -> &'static str {
        "gridsynth"
    }

    fn synthesize(
        &self,
        angle: f64,
        tolerance: Option<f64>,
        seed: Option<u64>,
    ) -> CompileResult<String> {
        let args = Self::args(angle, tolerance, seed);
        trace!("{} {}", self.path.display(), args.join(" "));

        let output = Command::new(&self.path).args(&args).output().map_err(|e| {
            CompileError::OracleFailed(format!("cannot run {}: {e}", self.path.display()))
        })?;

        if !output.status.success() {
            return Err(CompileError::OracleFailed(format!(
                "{} exited with {}: {}",
                self.path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_minimal() {
        assert_eq!(GridsynthOracle::args(0.5, None, None), vec!["(0.5)", "-p"]);
    }

    #[test]
    fn test_args_with_tolerance_and_seed() {
        assert_eq!(
            GridsynthOracle::args(1.25, Some(1e-5), Some(32)),
            vec!["(1.25)", "-p", "-e", "0.00001", "-r", "32"]
        );
    }

    #[test]
    fn test_args_are_deterministic() {
        let a = GridsynthOracle::args(std::f64::consts::FRAC_PI_8, Some(1e-3), Some(7));
        let b = GridsynthOracle::args(std::f64::consts::FRAC_PI_8, Some(1e-3), Some(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_default_path_layout() {
        let path = default_binary_path();
        assert!(path.ends_with(Path::new(".cqc_qhe").join("bin").join(binary_name())));
        assert!(download_url().starts_with("https://www.mathstat.dal.ca/~selinger/newsynth/"));
    }

    #[test]
    fn test_missing_binary_reports_failure() {
        let oracle = GridsynthOracle::new("/nonexistent/gridsynth");
        assert!(matches!(
            oracle.synthesize(0.1, None, None),
            Err(CompileError::OracleFailed(_))
        ));
    }
}
