use std::fs;
use std::path::{Path, PathBuf};

pub fn embeddings_file_name(build: &str) -> String {
    format!("embeddings_{}.csv", build)
}

pub fn embeddings_file(scratch_dir: &Path, build: &str) -> PathBuf {
    scratch_dir.join(embeddings_file_name(build))
}

pub fn ensure_scratch_dir(scratch_dir: &Path) -> std::io::Result<PathBuf> {
    ensure_dir(scratch_dir)?;
    Ok(scratch_dir.to_path_buf())
}

/// Local file name for a storage object: its last path segment.
pub fn object_file_name(object_name: &str) -> Option<&str> {
    Path::new(object_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
