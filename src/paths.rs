use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Append `.ext` unless the path already ends with that extension.
///
/// An unrelated extension is kept, so `take.txt` becomes `take.txt.wav`.
pub fn ensure_extension(path: &Path, ext: &str) -> PathBuf {
    let has_ext = path
        .extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext));
    if has_ext {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// File stem used to name derived outputs (`recording.wav` -> `recording`)
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "signal".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_extension() {
        assert_eq!(
            ensure_extension(Path::new("take"), "wav"),
            PathBuf::from("take.wav")
        );
        assert_eq!(
            ensure_extension(Path::new("dir/take.WAV"), "wav"),
            PathBuf::from("dir/take.WAV")
        );
        assert_eq!(
            ensure_extension(Path::new("take.txt"), "csv"),
            PathBuf::from("take.txt.csv")
        );
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("data/test_recording.wav")), "test_recording");
        assert_eq!(base_name(Path::new("noisy_sine")), "noisy_sine");
    }
}
