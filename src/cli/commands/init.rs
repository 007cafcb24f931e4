//! Initialize ktlint-cache in a project

use std::fs;
use std::path::Path;

use ktlint_cache::config::ProjectConfig;
use ktlint_cache::output::{OperationResult, OutputMode};
use ktlint_cache::paths;

/// Write a starter `.ktlint.toml`
pub fn init(root: &Path, force: bool, mode: OutputMode) -> anyhow::Result<()> {
    let path = paths::config_file(root);

    if path.exists() && !force {
        OperationResult {
            success: false,
            message: format!(
                "Already initialized ({} exists). Use --force to reinitialize.",
                paths::CONFIG_FILE
            ),
        }
        .render(mode);
        return Ok(());
    }

    fs::write(&path, ProjectConfig::template())?;

    OperationResult {
        success: true,
        message: format!("Created {}", path.display()),
    }
    .render(mode);

    Ok(())
}
