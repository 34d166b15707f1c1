//! # Case File I/O
//!
//! Reads and writes [`VesselCase`] JSON files:
//! - **Atomic saves**: write to a `.tmp` sibling, sync, rename over the target
//! - **Version validation**: reject files from an incompatible schema
//! - **Validation on load**: the hull is checked during deserialization, the
//!   loadcase and settings right after
//!
//! ## Example
//!
//! ```rust,no_run
//! use hydro_core::case::VesselCase;
//! use hydro_core::case_io::{load_case, save_case};
//! use std::path::Path;
//!
//! let case = VesselCase::sample_barge()?;
//! save_case(&case, Path::new("barge.json"))?;
//! let loaded = load_case(Path::new("barge.json"))?;
//! assert_eq!(case, loaded);
//! # Ok::<(), hydro_core::errors::HydroError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::case::{VesselCase, SCHEMA_VERSION};
use crate::errors::{HydroError, HydroResult};

/// Save a case with atomic write semantics.
///
/// 1. Serialize to pretty JSON
/// 2. Write to `<path>.tmp`
/// 3. fsync
/// 4. Rename over `path`
pub fn save_case(case: &VesselCase, path: &Path) -> HydroResult<()> {
    let json = to_json(case)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| temp_file_error("create temp file", &tmp_path, e))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| temp_file_error("write temp file", &tmp_path, e))?;

    tmp_file.sync_all().map_err(|e| temp_file_error("sync temp file", &tmp_path, e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        HydroError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), "saved case");
    Ok(())
}

fn temp_file_error(operation: &str, tmp_path: &Path, e: std::io::Error) -> HydroError {
    HydroError::file_error(operation, tmp_path.display().to_string(), e.to_string())
}

/// Load and validate a case file.
///
/// # Errors
///
/// * `FileError` - the file cannot be read
/// * `Serialization` - invalid JSON or an invalid hull
/// * `VersionMismatch` - incompatible schema version
/// * `InvalidInput` - invalid loadcase or settings
pub fn load_case(path: &Path) -> HydroResult<VesselCase> {
    let contents = fs::read_to_string(path)
        .map_err(|e| HydroError::file_error("read", path.display().to_string(), e.to_string()))?;
    let case = from_json(&contents).map_err(|e| match e {
        HydroError::Serialization { reason } => HydroError::Serialization {
            reason: format!("Invalid case file {}: {}", path.display(), reason),
        },
        other => other,
    })?;
    tracing::debug!(
        path = %path.display(),
        stations = case.hull.station_count(),
        waterlines = case.hull.waterline_count(),
        "loaded case"
    );
    Ok(case)
}

/// Parse and validate a case from a JSON string.
pub fn from_json(json: &str) -> HydroResult<VesselCase> {
    let case: VesselCase = serde_json::from_str(json)
        .map_err(|e| HydroError::Serialization { reason: e.to_string() })?;
    validate_version(&case.version)?;
    case.validate()?;
    Ok(case)
}

/// Serialize a case to pretty JSON.
pub fn to_json(case: &VesselCase) -> HydroResult<String> {
    serde_json::to_string_pretty(case)
        .map_err(|e| HydroError::Serialization { reason: e.to_string() })
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Major versions must match; in 0.x a newer minor is also rejected.
fn validate_version(file_version: &str) -> HydroResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);
    let mismatch = || HydroError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first())
    else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if current_major == 0 {
        if let (Some(&file_minor), Some(&current_minor)) =
            (file_parts.get(1), current_parts.get(1))
        {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_case_path(name: &str) -> PathBuf {
        temp_dir().join(format!("hydro_case_test_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_case_path("roundtrip");
        let case = VesselCase::sample_wigley().unwrap();
        save_case(&case, &path).unwrap();

        let loaded = load_case(&path).unwrap();
        assert_eq!(loaded, case);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_case_path("atomic");
        save_case(&VesselCase::sample_barge().unwrap(), &path).unwrap();
        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_tmp_path_keeps_extension() {
        assert_eq!(
            tmp_path_for(Path::new("/cases/barge.json")),
            Path::new("/cases/barge.json.tmp")
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_case(&temp_case_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_invalid_json_and_version() {
        assert_eq!(from_json("{not json").unwrap_err().error_code(), "SERIALIZATION_ERROR");

        let mut case = VesselCase::sample_barge().unwrap();
        case.version = "1.0.0".to_string();
        let err = from_json(&to_json(&case).unwrap()).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_invalid_loadcase_rejected_on_load() {
        let mut case = VesselCase::sample_barge().unwrap();
        case.loadcase.water_density_kg_m3 = -1.0;
        let err = from_json(&to_json(&case).unwrap()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
