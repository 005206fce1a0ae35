use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Write `<artifact>.provenance.json` next to a placement result: code
/// revision, library version, the scene it came from and the tolerances used.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, scene: &Path, cfg: Value) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let doc = json!({
        "code_rev": current_git_rev(),
        "vertexpos": vertexpos::VERSION,
        "scene": scene.to_string_lossy(),
        "cfg": cfg,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("placement"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Build-time `GIT_COMMIT`, then the runtime variable, then `git rev-parse`.
pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_artifact() {
        let derived = sidecar_path(Path::new("/tmp/out/vertex.json"));
        assert_eq!(derived, Path::new("/tmp/out/vertex.provenance.json"));
    }

    #[test]
    fn sidecar_records_scene_and_cfg() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("v.json");
        let path = write_sidecar(&artifact, Path::new("scene.json"), json!({"edge_tol": 1e-6})).unwrap();
        assert!(path.exists());
        let doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(doc["scene"], "scene.json");
        assert_eq!(doc["cfg"]["edge_tol"], 1e-6);
        assert_eq!(doc["vertexpos"], vertexpos::VERSION);
        assert_eq!(doc["outputs"][0], artifact.to_string_lossy().as_ref());
    }
}
