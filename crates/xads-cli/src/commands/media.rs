//! `x-ads media`: media upload utilities.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use xads_client::MediaCategory;

use crate::context;
use crate::output;

#[derive(Debug, Subcommand)]
pub enum MediaCommand {
    /// Upload a media file and print the media_key.
    Upload(UploadArgs),
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to media file (.jpg, .png, .gif, .webp, .mp4).
    pub path: PathBuf,
}

/// MIME type from the file extension.
pub fn mime_for(path: &Path) -> anyhow::Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        "mp4" => Ok("video/mp4"),
        other => anyhow::bail!(
            "unsupported media extension {other:?}: use .jpg, .png, .gif, .webp, or .mp4"
        ),
    }
}

/// Upload category for a MIME type.
pub fn category_for(mime: &str) -> MediaCategory {
    MediaCategory::from_mime(mime)
}

pub async fn run(command: MediaCommand, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        MediaCommand::Upload(args) => {
            let bytes = std::fs::read(&args.path)
                .with_context(|| format!("could not read {}", args.path.display()))?;
            let mime = mime_for(&args.path)?;

            let client = context::build_client(cancel)?;
            let uploaded = client
                .upload_media(&bytes, mime, category_for(mime))
                .await?;

            output::print_ok(&json!({
                "media_id": uploaded.media_id,
                "media_key": uploaded.media_key,
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_detection_covers_supported_extensions() {
        assert_eq!(mime_for(Path::new("a.JPG")).unwrap(), "image/jpeg");
        assert_eq!(mime_for(Path::new("b.png")).unwrap(), "image/png");
        assert_eq!(mime_for(Path::new("c.gif")).unwrap(), "image/gif");
        assert_eq!(mime_for(Path::new("d.mp4")).unwrap(), "video/mp4");
        assert!(mime_for(Path::new("e.txt")).is_err());
        assert!(mime_for(Path::new("noext")).is_err());
    }

    #[test]
    fn categories_follow_mime() {
        assert_eq!(category_for("image/png"), MediaCategory::TweetImage);
        assert_eq!(category_for("image/gif"), MediaCategory::TweetGif);
        assert_eq!(category_for("video/mp4"), MediaCategory::TweetVideo);
    }
}
