/// Video post-processor
///
/// Shells out to ffprobe for aspect classification and to ffmpeg for the
/// fast-start remux. Both operations are single-shot and synchronous; tool
/// paths come from configuration. Tool stdout/stderr are captured and
/// discarded except for the probe output itself.
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tempfile::TempPath;

use crate::config::MediaToolsConfig;
use crate::error::{AppError, Result};

/// Aspect bucket used as the leading object-key segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectClass {
    Portrait,
    Landscape,
    Other,
}

impl AspectClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Clone)]
pub struct VideoProcessor {
    ffprobe_path: String,
    ffmpeg_path: String,
}

impl VideoProcessor {
    pub fn new(cfg: &MediaToolsConfig) -> Self {
        Self {
            ffprobe_path: cfg.ffprobe_path.clone(),
            ffmpeg_path: cfg.ffmpeg_path.clone(),
        }
    }

    /// Pixel dimensions of the first stream, via ffprobe's JSON output.
    pub fn probe_dimensions(&self, input: &Path) -> Result<Dimensions> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(input)
            .output()
            .map_err(|e| AppError::MediaTool(format!("ffprobe spawn error: {e}")))?;

        if !output.status.success() {
            return Err(AppError::MediaTool("ffprobe failed".to_string()));
        }

        parse_probe_output(&output.stdout)
    }

    /// Buckets by the integer ratio `width / height`: 9:16-ish inputs
    /// truncate to 0, 16:9-ish to 1. Coarser than a true aspect-ratio
    /// comparison; square and 4:3 land in the landscape bucket.
    pub fn classify_aspect(dims: Dimensions) -> AspectClass {
        match dims.width / dims.height {
            0 => AspectClass::Portrait,
            1 => AspectClass::Landscape,
            _ => AspectClass::Other,
        }
    }

    /// Copy streams verbatim while relocating container metadata to the
    /// front of the file. The returned path is removed on drop.
    pub fn remux_faststart(&self, input: &Path) -> Result<TempPath> {
        let mut raw = input.as_os_str().to_owned();
        raw.push(".processing");
        let output_path = PathBuf::from(raw);

        let result = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path)
            .output()
            .map_err(|e| AppError::MediaTool(format!("ffmpeg spawn error: {e}")))?;

        if !result.status.success() {
            let _ = std::fs::remove_file(&output_path);
            return Err(AppError::MediaTool("ffmpeg remux failed".to_string()));
        }

        Ok(TempPath::from_path(output_path))
    }
}

fn parse_probe_output(stdout: &[u8]) -> Result<Dimensions> {
    let parsed: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| AppError::MediaTool(format!("ffprobe json parse: {e}")))?;

    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| AppError::MediaTool("ffprobe reported no streams".to_string()))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if height > 0 => Ok(Dimensions { width, height }),
        _ => Err(AppError::MediaTool(
            "ffprobe reported no pixel dimensions".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn processor(ffprobe: &str, ffmpeg: &str) -> VideoProcessor {
        VideoProcessor::new(&MediaToolsConfig {
            ffprobe_path: ffprobe.to_string(),
            ffmpeg_path: ffmpeg.to_string(),
        })
    }

    #[test]
    fn classification_is_deterministic() {
        let landscape = Dimensions {
            width: 1920,
            height: 1080,
        };
        let portrait = Dimensions {
            width: 1080,
            height: 1920,
        };
        let other = Dimensions {
            width: 1000,
            height: 300,
        };

        assert_eq!(
            VideoProcessor::classify_aspect(landscape),
            AspectClass::Landscape
        );
        assert_eq!(
            VideoProcessor::classify_aspect(portrait),
            AspectClass::Portrait
        );
        assert_eq!(VideoProcessor::classify_aspect(other), AspectClass::Other);
    }

    #[test]
    fn square_video_counts_as_landscape() {
        // 1:1 truncates to ratio 1, same bucket as 16:9
        let square = Dimensions {
            width: 720,
            height: 720,
        };
        assert_eq!(
            VideoProcessor::classify_aspect(square),
            AspectClass::Landscape
        );
    }

    #[test]
    fn parses_first_stream_dimensions() {
        let stdout = br#"{
            "streams": [
                {"index": 0, "codec_name": "h264", "width": 1920, "height": 1080},
                {"index": 1, "codec_name": "aac"}
            ]
        }"#;
        let dims = parse_probe_output(stdout).unwrap();
        assert_eq!(dims.width, 1920);
        assert_eq!(dims.height, 1080);
    }

    #[test]
    fn empty_stream_list_is_an_error() {
        assert!(matches!(
            parse_probe_output(br#"{"streams": []}"#),
            Err(AppError::MediaTool(_))
        ));
    }

    #[test]
    fn garbage_output_is_an_error() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(AppError::MediaTool(_))
        ));
    }

    #[test]
    fn remux_failure_surfaces_tool_error() {
        let input = tempfile::NamedTempFile::new().unwrap();
        // `false` exits non-zero regardless of arguments
        let result = processor("ffprobe", "false").remux_faststart(input.path());
        assert!(matches!(result, Err(AppError::MediaTool(_))));
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let result = processor("/nonexistent/ffprobe", "ffmpeg").probe_dimensions(input.path());
        assert!(matches!(result, Err(AppError::MediaTool(_))));
    }

    #[test]
    fn remux_output_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4.processing");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"remuxed").unwrap();
        drop(file);

        {
            let _scoped = TempPath::from_path(path.clone());
            assert!(path.exists());
        }
        assert!(!path.exists());
    }
}
