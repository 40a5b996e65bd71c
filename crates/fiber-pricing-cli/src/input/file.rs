use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

use fiber_pricing_core::PricingConfig;

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a JSON file as a generic serde_json::Value.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    read_json(path)
}

/// Load the pricing configuration, or the seeded defaults when no path is given.
///
/// `.yaml` / `.yml` files are parsed as YAML, anything else as JSON. Sections
/// missing from the file keep their defaults.
pub fn read_config(path: Option<&str>) -> Result<PricingConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(PricingConfig::default());
    };

    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let is_yaml = matches!(
        canonical.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let config: PricingConfig = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    config.validate()?;

    tracing::debug!(
        path = %canonical.display(),
        plans = config.plans.tiers().len(),
        "loaded pricing config"
    );
    Ok(config)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    // Basic existence check
    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("fpc-{}-{name}", std::process::id()));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_no_path_is_default() {
        assert_eq!(read_config(None).unwrap(), PricingConfig::default());
    }

    #[test]
    fn test_yaml_config_overrides_taxes() {
        let path = write_temp(
            "taxes.yaml",
            "taxes:\n  national_tax_pct: 8\n  banda_cost_per_mbps: 1.5\n  overhead_pct: 5\n",
        );
        let config = read_config(Some(&path)).unwrap();
        assert_eq!(config.taxes.national_tax_pct, rust_decimal::Decimal::from(8));
        assert_eq!(config.plans, PricingConfig::default().plans);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_json_config_with_bad_rate_is_rejected() {
        let path = write_temp(
            "rates.json",
            r#"{"commissions": {"channel_director": {"12": 120}}}"#,
        );
        assert!(read_config(Some(&path)).is_err());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_config(Some("/definitely/not/here.json")).is_err());
    }
}
