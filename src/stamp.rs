//! Build-identity stamp for the embedded bytecode.
//!
//! The runtime compares this GUID against cached bytecode, so it must change
//! whenever any header changes, and only once every family has been
//! regenerated.

use crate::config::RunConfig;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// What the stamper does at the end of a normal (non-verify) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampDecision {
    /// No header changed; the previous stamp stays valid.
    NotRequired,
    /// Headers changed for one family only; stamping would mix identities.
    PartialRegeneration,
    /// Write a fresh stamp.
    Stamp,
}

pub fn decide(config: &RunConfig, changed: bool) -> StampDecision {
    if !changed {
        StampDecision::NotRequired
    } else if !config.all_families() {
        StampDecision::PartialRegeneration
    } else {
        StampDecision::Stamp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStamp(Uuid);

impl BuildStamp {
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The stamp as a C++ `GUID` constant.
    pub fn render(&self) -> String {
        let (d1, d2, d3, d4) = self.0.as_fields();
        let tail = d4
            .iter()
            .map(|b| format!("0x{:02x}", b))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"//-------------------------------------------------------------------------------------------------------
// Copyright (C) Microsoft. All rights reserved.
// Copyright (c) 2021 ChakraCore Project Contributors. All rights reserved.
// Licensed under the MIT license. See LICENSE.txt file in the project root for full license information.
//-------------------------------------------------------------------------------------------------------
// NOTE: If there is a merge conflict the correct fix is to make a new GUID.
// This file was generated with tools/regenByteCode.py

// {{{}}}
const GUID byteCodeCacheReleaseFileVersion =
{{ 0x{:08x}, 0x{:04x}, 0x{:04x}, {{{}}} }};

"#,
            self.0.hyphenated(),
            d1,
            d2,
            d3,
            tail
        )
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())
            .with_context(|| format!("Failed to write build stamp {}", path.display()))
    }
}

/// Report `decision` and write a new stamp when it says so.
pub fn apply(config: &RunConfig, decision: StampDecision) -> Result<()> {
    match decision {
        StampDecision::NotRequired => {
            println!("{} Bytecode update was not required", "✓".green());
        }
        StampDecision::PartialRegeneration => {
            println!(
                "{} Bytecode updated for one variant only - ensure you re-run for both variants before submitting code",
                "!".yellow()
            );
        }
        StampDecision::Stamp => {
            println!("{} Generating new GUID for new bytecode", "⚙".cyan());
            BuildStamp::random().write_to(&config.stamp_path())?;
            println!(
                "{} Bytecode successfully regenerated. Please rebuild ChakraCore to incorporate it.",
                "✓".green()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Flags, Layout, Platform};
    use std::path::PathBuf;

    fn config(flags: Flags) -> RunConfig {
        RunConfig::new(flags, PathBuf::from("/repo"), Layout::default(), Platform::Posix).unwrap()
    }

    #[test]
    fn test_decide_gate() {
        let both = config(Flags::default());
        let jit_only = config(Flags {
            jit: true,
            ..Default::default()
        });

        assert_eq!(decide(&both, true), StampDecision::Stamp);
        assert_eq!(decide(&both, false), StampDecision::NotRequired);
        assert_eq!(decide(&jit_only, true), StampDecision::PartialRegeneration);
        assert_eq!(decide(&jit_only, false), StampDecision::NotRequired);
    }

    #[test]
    fn test_render_guid_fields() {
        let uuid = Uuid::parse_str("0123abcd-4567-89ef-0a1b-2c3d4e5f6071").unwrap();
        let text = BuildStamp::from_uuid(uuid).render();
        assert!(text.contains("// {0123abcd-4567-89ef-0a1b-2c3d4e5f6071}\n"));
        assert!(text.contains(
            "{ 0x0123abcd, 0x4567, 0x89ef, {0x0a, 0x1b, 0x2c, 0x3d, 0x4e, 0x5f, 0x60, 0x71} };\n\n"
        ));
        assert!(text.contains("NOTE: If there is a merge conflict the correct fix is to make a new GUID."));
    }

    #[test]
    fn test_random_stamps_differ() {
        assert_ne!(BuildStamp::random(), BuildStamp::random());
    }

    #[test]
    fn test_write_overwrites_previous_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ByteCodeCacheReleaseFileVersion.h");
        fs::write(&path, "old stamp").unwrap();

        let stamp = BuildStamp::random();
        stamp.write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), stamp.render());
    }
}
