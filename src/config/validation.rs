//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for ServiceConfig.
///
/// Maintained by hand to match the struct hierarchy in service_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [service]
        "service",
        "service.name",
        "service.engine",
        "service.source",
        // [server]
        "server",
        "server.addr",
        // [analysis]
        "analysis",
        "analysis.default_radius_km",
        "analysis.max_radius_km",
        "analysis.max_reported_anomalies",
        "analysis.rng_seed",
        // [worker]
        "worker",
        "worker.enabled",
        "worker.heartbeat_interval_secs",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so output is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|&(dist, _)| dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Check numeric limits on a parsed ServiceConfig. Returns error messages.
pub fn validate_ranges(config: &super::ServiceConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let a = &config.analysis;

    if !a.max_radius_km.is_finite() || a.max_radius_km <= 0.0 {
        errors.push(format!(
            "analysis.max_radius_km = {} must be a finite number > 0",
            a.max_radius_km
        ));
    }
    if !a.default_radius_km.is_finite() || a.default_radius_km <= 0.0 {
        errors.push(format!(
            "analysis.default_radius_km = {} must be a finite number > 0",
            a.default_radius_km
        ));
    } else if a.default_radius_km > a.max_radius_km {
        errors.push(format!(
            "analysis.default_radius_km ({:.1}) must be <= max_radius_km ({:.1})",
            a.default_radius_km, a.max_radius_km
        ));
    }
    if a.max_reported_anomalies == 0 {
        errors.push("analysis.max_reported_anomalies must be > 0".to_string());
    }
    if config.worker.heartbeat_interval_secs == 0 {
        errors.push("worker.heartbeat_interval_secs must be > 0".to_string());
    }

    errors
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("anomolies", "anomalies"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [analysis]
            rng_seed = 7
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"analysis".to_string()));
        assert!(keys.contains(&"analysis.rng_seed".to_string()));
    }

    #[test]
    fn test_unknown_key_with_suggestion() {
        let warnings = validate_unknown_keys(
            r#"
            [analysis]
            max_radius_kms = 100.0
            "#,
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "analysis.max_radius_kms");
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("analysis.max_radius_km")
        );
        assert!(warnings[0].to_string().contains("did you mean"));
    }

    #[test]
    fn test_unknown_key_without_suggestion() {
        let warnings = validate_unknown_keys("[telemetry]\nendpoint = \"x\"");
        assert!(warnings.iter().all(|w| w.suggestion.is_none()));
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_known_keys_produce_no_warnings() {
        let toml_str = ServiceConfig::default().to_toml().unwrap();
        assert!(validate_unknown_keys(&toml_str).is_empty());
    }

    #[test]
    fn test_non_finite_radius_rejected() {
        let mut config = ServiceConfig::default();
        config.analysis.max_radius_km = f64::INFINITY;
        let errors = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("max_radius_km")));
    }
}
