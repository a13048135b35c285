use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use shared::config::Settings;

/// Generates a default settings file in the specified format.
///
/// # Arguments
/// * `format` - The format of the settings file ("yaml" or "json").
/// * `output` - Where to write it; stdout when absent.
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file fails.
pub fn generate_config(format: &str, output: Option<&Path>) -> Result<()> {
    let settings = Settings::with_defaults();
    let serialized = match format {
        "yaml" => serde_yml::to_string(&settings).context("failed to serialize settings")?,
        "json" => {
            let mut json =
                serde_json::to_string_pretty(&settings).context("failed to serialize settings")?;
            json.push('\n');
            json
        }
        _ => bail!("Unsupported format. Use 'yaml' or 'json'."),
    };

    match output {
        Some(path) => {
            fs::write(path, serialized)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Settings file '{}' generated successfully.", path.display());
        }
        None => io::stdout().write_all(serialized.as_bytes())?,
    }
    Ok(())
}
