//! The three ordered build stages.

use serde::Serialize;
use std::fmt;

use crate::environment::EnvironmentSnapshot;
use crate::shell::Invocation;

/// One external build-system invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStage {
    /// Generate build files.
    Configure,
    /// Compile in parallel.
    Compile,
    /// Install outputs to their destination.
    Install,
}

impl BuildStage {
    /// Every stage, in execution order.
    pub const ALL: [BuildStage; 3] = [
        BuildStage::Configure,
        BuildStage::Compile,
        BuildStage::Install,
    ];

    /// Lower-case stage name.
    pub fn name(&self) -> &'static str {
        match self {
            BuildStage::Configure => "configure",
            BuildStage::Compile => "compile",
            BuildStage::Install => "install",
        }
    }

    /// The invocation of `tool` for this stage.
    pub fn invocation(
        &self,
        tool: &str,
        snapshot: &EnvironmentSnapshot,
        jobs: usize,
    ) -> Invocation {
        let build_dir = snapshot.build_dir.display().to_string();
        let inv = Invocation::new(tool).cwd(&snapshot.source_dir);
        match self {
            BuildStage::Configure => inv
                .arg("-S")
                .arg(snapshot.source_dir.display().to_string())
                .arg("-B")
                .arg(build_dir)
                .arg(format!(
                    "-DCMAKE_PREFIX_PATH={}",
                    snapshot.toolchain_root.display()
                )),
            BuildStage::Compile => inv.arg("--build").arg(build_dir).arg(format!("-j{}", jobs)),
            BuildStage::Install => inv.arg("--install").arg(build_dir),
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BindupConfig;
    use crate::environment::{DistroIdentity, HostFacts, RuntimeVersion};
    use std::path::{Path, PathBuf};

    fn snapshot() -> EnvironmentSnapshot {
        let facts = HostFacts {
            runtime_version: Some(RuntimeVersion::new(3, 12, 0)),
            installed_toolchain: None,
            distro: DistroIdentity::new("debian", "12"),
            home: Some(PathBuf::from("/home/dev")),
        };
        EnvironmentSnapshot::assemble(facts, Path::new("/src"), &BindupConfig::default())
    }

    #[test]
    fn configure_points_at_toolchain_root() {
        let inv = BuildStage::Configure.invocation("cmake", &snapshot(), 3);
        assert_eq!(
            inv.display(),
            "cmake -S /src -B /src/build -DCMAKE_PREFIX_PATH=/src/Qt/6.6.2/gcc_64"
        );
    }

    #[test]
    fn compile_passes_job_count() {
        let inv = BuildStage::Compile.invocation("cmake", &snapshot(), 7);
        assert_eq!(inv.display(), "cmake --build /src/build -j7");
    }

    #[test]
    fn install_targets_build_dir() {
        let inv = BuildStage::Install.invocation("cmake", &snapshot(), 7);
        assert_eq!(inv.display(), "cmake --install /src/build");
    }

    #[test]
    fn stages_run_from_source_dir() {
        for stage in BuildStage::ALL {
            let inv = stage.invocation("cmake", &snapshot(), 1);
            assert_eq!(inv.cwd.as_deref(), Some(Path::new("/src")));
        }
    }

    #[test]
    fn stages_are_ordered() {
        let names: Vec<&str> = BuildStage::ALL.iter().map(BuildStage::name).collect();
        assert_eq!(names, ["configure", "compile", "install"]);
    }
}
