//! Run configuration.
//!
//! A [`RunConfig`] is assembled once from the command line flags, the detected
//! platform and the optional `regen.toml` layout file. It is validated up front
//! and then passed by reference to every stage of the pipeline.

use crate::error::RegenError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const LAYOUT_FILE: &str = "regen.toml";

/// Host platform, selects the build system and default binary locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    pub fn detect() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

/// Build family: with or without the optimizing compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Family {
    NoJit,
    Jit,
}

impl Family {
    /// Families in the order they are always built and generated.
    pub const ALL: [Family; 2] = [Family::NoJit, Family::Jit];

    /// Directory name under `out/` used by the POSIX build.
    pub fn out_dir_name(self) -> &'static str {
        match self {
            Family::NoJit => "noJit",
            Family::Jit => "Jit",
        }
    }

    fn header_infix(self) -> &'static str {
        match self {
            Family::NoJit => ".nojit",
            Family::Jit => "",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::NoJit => write!(f, "no Jit"),
            Family::Jit => write!(f, "Jit"),
        }
    }
}

/// Pointer width of the emitted bytecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Bits64,
    Bits32,
}

impl Width {
    fn suffix(self) -> &'static str {
        match self {
            Width::Bits64 => "64b",
            Width::Bits32 => "32b",
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Width::Bits64 => write!(f, "64bit"),
            Width::Bits32 => write!(f, "32bit"),
        }
    }
}

/// One output document target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub family: Family,
    pub width: Width,
}

impl Variant {
    pub fn header_file_name(&self) -> String {
        format!(
            "JsBuiltIn{}.bc.{}.h",
            self.family.header_infix(),
            self.width.suffix()
        )
    }

    /// Message printed when the host binary fails for this variant.
    pub fn codegen_error(&self) -> String {
        match self.family {
            Family::NoJit => format!("Failed to generate noJit {} JsBuiltin Bytecode", self.width),
            Family::Jit => format!("Failed to generate {} JsBuiltin Bytecode", self.width),
        }
    }
}

/// Repository layout, relative to the root. Overridable through `regen.toml`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Layout {
    pub build_script: String,
    pub solution: String,
    pub build_jobs: u32,
    pub out_dir: String,
    pub library_dir: String,
    pub stamp_file: String,
    pub script_extension: String,
    pub excluded_script: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            build_script: "build.sh".to_string(),
            solution: "Build/Chakra.Core.sln".to_string(),
            build_jobs: 8,
            out_dir: "out".to_string(),
            library_dir: "lib/Runtime/Library/InJavascript".to_string(),
            stamp_file: "lib/Runtime/Bytecode/ByteCodeCacheReleaseFileVersion.h".to_string(),
            script_extension: "js".to_string(),
            excluded_script: "Intl.js".to_string(),
        }
    }
}

impl Layout {
    /// Load `regen.toml` from `root`, falling back to the built-in layout.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(LAYOUT_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {} - check for syntax errors", path.display()))
    }
}

/// Raw command line switches, before validation.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub skip_build: bool,
    pub jit: bool,
    pub no_jit: bool,
    pub verify: bool,
    pub binary: Option<PathBuf>,
    pub x86: bool,
}

/// Validated, immutable settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub layout: Layout,
    pub platform: Platform,
    pub verify: bool,
    pub skip_build: bool,
    pub families: Vec<Family>,
    pub override_binary: Option<PathBuf>,
    pub x86: bool,
}

impl RunConfig {
    pub fn new(
        flags: Flags,
        root: PathBuf,
        layout: Layout,
        platform: Platform,
    ) -> Result<Self, RegenError> {
        // `--jit` and `--noJit` together mean the default: both families
        let families = match (flags.jit, flags.no_jit) {
            (true, false) => vec![Family::Jit],
            (false, true) => vec![Family::NoJit],
            _ => Family::ALL.to_vec(),
        };

        if flags.x86 && flags.binary.is_none() {
            return Err(RegenError::InvalidFlags(
                "x86 build can only be used when pre-built and provided with the --binary command line parameter"
                    .to_string(),
            ));
        }

        if flags.binary.is_some() && families.len() != 1 {
            return Err(RegenError::InvalidFlags(
                "Cannot use override binary option without specifying either jit or noJit"
                    .to_string(),
            ));
        }

        Ok(Self {
            root,
            layout,
            platform,
            verify: flags.verify,
            skip_build: flags.skip_build || flags.binary.is_some(),
            families,
            override_binary: flags.binary,
            x86: flags.x86,
        })
    }

    /// True when every build family takes part in this run.
    pub fn all_families(&self) -> bool {
        Family::ALL.iter().all(|f| self.families.contains(f))
    }

    /// Widths generated per family. A pre-built x86 binary only yields 32-bit output.
    pub fn widths(&self) -> Vec<Width> {
        if self.x86 {
            vec![Width::Bits32]
        } else {
            vec![Width::Bits64, Width::Bits32]
        }
    }

    /// Every output document of this run, in generation order.
    pub fn variants(&self) -> Vec<Variant> {
        let widths = self.widths();
        self.families
            .iter()
            .flat_map(|&family| widths.iter().map(move |&width| Variant { family, width }))
            .collect()
    }

    pub fn library_dir(&self) -> PathBuf {
        self.root.join(&self.layout.library_dir)
    }

    pub fn output_path(&self, variant: &Variant) -> PathBuf {
        self.library_dir().join(variant.header_file_name())
    }

    pub fn stamp_path(&self) -> PathBuf {
        self.root.join(&self.layout.stamp_file)
    }
}
