//! Image embedding commands.
//!
//! # Usage
//!
//! ```bash
//! ss-cli image set --book windows-of-change-1 cover.png
//! ss-cli image set --about portrait.jpg
//! ss-cli image set --logo logo.svg
//! ```

use std::path::Path;

use soft_stories_cms::SiteConfig;
use soft_stories_cms::gateway::ImageTarget;
use soft_stories_cms::media::embed_image_file;
use soft_stories_core::BookId;

use super::{CommandError, ensure_persisted, open};

/// Pick the image target from the command flags.
///
/// # Errors
///
/// Returns `CommandError::InvalidArgument` unless exactly one target is
/// given.
pub fn target(book: Option<String>, about: bool, logo: bool) -> Result<ImageTarget, CommandError> {
    match (book, about, logo) {
        (Some(id), false, false) => Ok(ImageTarget::BookCover(BookId::new(id))),
        (None, true, false) => Ok(ImageTarget::AboutPortrait),
        (None, false, true) => Ok(ImageTarget::SiteLogo),
        _ => Err(CommandError::InvalidArgument(
            "choose exactly one of --book <ID>, --about or --logo".to_string(),
        )),
    }
}

/// Embed the image at `path` and assign it to `target`.
///
/// The file is read and encoded before any content is touched.
///
/// # Errors
///
/// Returns `CommandError` if the file is not a supported image, the book
/// does not exist, or the change cannot be stored.
pub async fn set(config: &SiteConfig, target: ImageTarget, path: &Path) -> Result<(), CommandError> {
    let uri = embed_image_file(path).await?;
    let bytes = uri.len();

    let mut ctx = open(config);
    ensure_persisted(ctx.gateway().set_image(&target, uri)?)?;
    tracing::info!(target = ?target, path = %path.display(), bytes, "Image embedded");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::loaded_content;

    #[test]
    fn test_target_requires_exactly_one() {
        assert!(target(None, false, false).is_err());
        assert!(target(Some("b".to_string()), true, false).is_err());
        assert_eq!(
            target(None, false, true).unwrap(),
            ImageTarget::SiteLogo
        );
    }

    #[tokio::test]
    async fn test_set_about_portrait() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            data_dir: dir.path().join("data"),
            ..SiteConfig::default()
        };
        let image = dir.path().join("portrait.gif");
        std::fs::write(&image, b"GIF89a\x01\0\x01\0").unwrap();

        set(&config, ImageTarget::AboutPortrait, &image).await.unwrap();
        assert!(
            loaded_content(&open(&config))
                .about
                .image_url
                .starts_with("data:image/gif;base64,")
        );
    }

    #[tokio::test]
    async fn test_set_unknown_book_cover() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            data_dir: dir.path().join("data"),
            ..SiteConfig::default()
        };
        let image = dir.path().join("cover.gif");
        std::fs::write(&image, b"GIF89a\x01\0\x01\0").unwrap();

        let target = ImageTarget::BookCover(BookId::new("missing"));
        assert!(set(&config, target, &image).await.is_err());
    }
}
