//! Extension based classification of directory entries.

use std::path::Path;

use super::types::{ConversionJob, JobKind, TARGET_EXTENSION};

/// Classifies a file name by its extension (ASCII case-insensitive).
pub fn classify(file_name: &str) -> JobKind {
    match extension_of(file_name) {
        Some(ext) if ext.eq_ignore_ascii_case("wav") => JobKind::Passthrough,
        Some(ext) if ext.eq_ignore_ascii_case("flac") || ext.eq_ignore_ascii_case("aiff") => {
            JobKind::Convertible
        }
        _ => JobKind::Ignored,
    }
}

/// Name of the target file: the source stem with a `.wav` extension.
///
/// Returns `None` for ignored entries.
pub fn target_file_name(file_name: &str) -> Option<String> {
    if !classify(file_name).is_audio() {
        return None;
    }
    let stem = Path::new(file_name).file_stem()?.to_string_lossy();
    Some(format!("{stem}.{TARGET_EXTENSION}"))
}

/// Builds the job for a source file, relocating its target into `output_folder`.
pub fn plan_job(source_path: &Path, output_folder: &Path) -> ConversionJob {
    let file_name = source_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let kind = classify(&file_name);
    let target_path = match target_file_name(&file_name) {
        Some(target) => output_folder.join(target),
        None => output_folder.join(&file_name),
    };

    ConversionJob {
        source_path: source_path.to_path_buf(),
        target_path,
        kind,
    }
}

fn extension_of(file_name: &str) -> Option<&str> {
    // `.wav` alone is a hidden file without an extension, as Path treats it.
    Path::new(file_name).extension().and_then(|e| e.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify("track.wav"), JobKind::Passthrough);
        assert_eq!(classify("track.flac"), JobKind::Convertible);
        assert_eq!(classify("track.aiff"), JobKind::Convertible);
        assert_eq!(classify("notes.txt"), JobKind::Ignored);
        assert_eq!(classify("track.mp3"), JobKind::Ignored);
        assert_eq!(classify("README"), JobKind::Ignored);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("LOUD.WAV"), JobKind::Passthrough);
        assert_eq!(classify("Mixed.Flac"), JobKind::Convertible);
        assert_eq!(classify("demo.AIFF"), JobKind::Convertible);
    }

    #[test]
    fn test_classify_hidden_file_without_extension() {
        assert_eq!(classify(".wav"), JobKind::Ignored);
        assert_eq!(classify(".flac"), JobKind::Ignored);
    }

    #[test]
    fn test_classify_uses_last_extension() {
        assert_eq!(classify("song.flac.txt"), JobKind::Ignored);
        assert_eq!(classify("song.txt.flac"), JobKind::Convertible);
    }

    #[test]
    fn test_target_file_name() {
        assert_eq!(target_file_name("a.wav").as_deref(), Some("a.wav"));
        assert_eq!(target_file_name("b.flac").as_deref(), Some("b.wav"));
        assert_eq!(target_file_name("c.aiff").as_deref(), Some("c.wav"));
        assert_eq!(target_file_name("D.FLAC").as_deref(), Some("D.wav"));
        assert_eq!(
            target_file_name("01 - Intro.flac").as_deref(),
            Some("01 - Intro.wav")
        );
        assert_eq!(target_file_name("c.txt"), None);
    }

    #[test]
    fn test_target_only_replaces_final_extension() {
        assert_eq!(
            target_file_name("live.flac.version.aiff").as_deref(),
            Some("live.flac.version.wav")
        );
    }

    #[test]
    fn test_plan_job_relocates_target() {
        let job = plan_job(
            Path::new("/music/album/b.flac"),
            Path::new("/music/album/album_wav"),
        );
        assert_eq!(job.kind, JobKind::Convertible);
        assert_eq!(job.source_path, PathBuf::from("/music/album/b.flac"));
        assert_eq!(job.target_path, PathBuf::from("/music/album/album_wav/b.wav"));
        assert_eq!(job.file_name(), "b.flac");
        assert_eq!(job.target_name(), "b.wav");
    }

    #[test]
    fn test_plan_job_ignored() {
        let job = plan_job(Path::new("/music/album/cover.jpg"), Path::new("/out"));
        assert_eq!(job.kind, JobKind::Ignored);
    }
}
