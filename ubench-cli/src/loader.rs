//! Result File Loading

use anyhow::Context;
use std::path::Path;
use ubench_logic::Group;

/// Parse a JSON result document and unflatten slash-separated names.
pub fn parse_results(json: &str) -> anyhow::Result<Group> {
    let tree: Group = serde_json::from_str(json).context("Invalid result document")?;
    Ok(tree.unflatten()?)
}

/// Load a JSON result file.
pub fn load_results(path: impl AsRef<Path>) -> anyhow::Result<Group> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read results from {}", path.display()))?;
    let tree = parse_results(&content)
        .with_context(|| format!("Failed to load results from {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        benchmarks = tree.leaf_count(),
        "Loaded results"
    );
    Ok(tree)
}
