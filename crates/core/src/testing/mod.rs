//! Testing utilities and mock implementations.
//!
//! `MockConverter` stands in for ffmpeg in batch tests. On Unix,
//! [`write_fake_ffmpeg`] produces a tiny shell script that behaves like
//! ffmpeg from the outside (last argument is the output, exit status and
//! stderr signal failure) so the real `FfmpegConverter` can be exercised
//! without ffmpeg installed.

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedConversion};

#[cfg(unix)]
pub use fake_ffmpeg::{write_fake_ffmpeg, FakeFfmpeg};

#[cfg(unix)]
mod fake_ffmpeg {
    use std::io;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Behavior of the scripted ffmpeg stand-in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FakeFfmpeg {
        /// Writes the output file and exits 0.
        Succeed,
        /// Writes a partial output, prints an error and exits 1.
        Fail,
        /// Writes a partial output and then sleeps for 30 seconds.
        Hang,
    }

    impl FakeFfmpeg {
        fn body(&self) -> &'static str {
            match self {
                Self::Succeed => "printf 'RIFF$WAVEfmt ' > \"$last\"\nexit 0\n",
                Self::Fail => concat!(
                    "printf 'RIF' > \"$last\"\n",
                    "echo \"$1: Invalid data found when processing input\" >&2\n",
                    "exit 1\n",
                ),
                Self::Hang => "printf 'RIF' > \"$last\"\nexec sleep 30\n",
            }
        }
    }

    /// Writes an executable `ffmpeg` script into `dir` and returns its path.
    pub fn write_fake_ffmpeg(dir: &Path, behavior: FakeFfmpeg) -> io::Result<PathBuf> {
        let path = dir.join("ffmpeg");
        let script = format!(
            concat!(
                "#!/bin/sh\n",
                "if [ \"$1\" = \"-version\" ]; then\n",
                "  echo 'ffmpeg version fake'\n",
                "  exit 0\n",
                "fi\n",
                "for last; do :; done\n",
                "{}",
            ),
            behavior.body()
        );
        std::fs::write(&path, script)?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }
}
