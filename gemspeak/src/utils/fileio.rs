use std::io;
use std::path::Path;

/// Creates the directory that will hold `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Reads a generated audio file back for display or download.
pub fn read_audio_file(path: &Path) -> io::Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    tracing::debug!("read {} bytes back from {}", bytes.len(), path.display());
    Ok(bytes)
}
