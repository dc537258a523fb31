//! Locates the host binary used to emit bytecode for a build family.

use crate::config::{Family, Platform, RunConfig};
use std::path::{Path, PathBuf};

/// Path of the host binary for `family`.
///
/// An override binary (`--binary`) wins for every family; `RunConfig` has
/// already rejected overrides that would apply to both families. A relative
/// override is taken from the current directory. Otherwise
/// the path is where the build step for the current platform leaves it.
pub fn resolve_binary(config: &RunConfig, family: Family) -> PathBuf {
    if let Some(path) = &config.override_binary {
        return std::path::absolute(path).unwrap_or_else(|_| path.clone());
    }

    match config.platform {
        Platform::Posix => config
            .root
            .join(&config.layout.out_dir)
            .join(family.out_dir_name())
            .join("debug")
            .join("ch"),
        Platform::Windows => {
            let build_dir = Path::new(&config.layout.solution)
                .parent()
                .unwrap_or_else(|| Path::new(""));
            let vc_build = match family {
                Family::NoJit => "VcBuild.NoJIT",
                Family::Jit => "VcBuild",
            };
            config
                .root
                .join(build_dir)
                .join(vc_build)
                .join("bin")
                .join("x64_debug")
                .join("ch.exe")
        }
    }
}
