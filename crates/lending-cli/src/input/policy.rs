use lending_core::risk::LendingPolicy;

use super::file;

/// Load a lending policy from YAML (or JSON, which YAML accepts). Without a
/// path the standard policy is used.
pub fn load_policy(path: Option<&str>) -> Result<LendingPolicy, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(LendingPolicy::default());
    };

    let (canonical, contents) = file::read_text(path)?;
    let policy: LendingPolicy = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse policy '{}': {}", canonical.display(), e))?;
    policy.validate()?;

    tracing::debug!(path = %canonical.display(), "lending policy loaded");
    Ok(policy)
}
