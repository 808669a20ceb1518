//! Image manifest for the character picker.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;

/// Extensions listed in the manifest, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Path prefix written in front of each file name.
pub const DEFAULT_PREFIX: &str = "./img";

/// Manifest file name inside the image directory.
pub const MANIFEST_FILE: &str = "images.json";

const EXCLUDED: [&str; 1] = ["favicon.ico"];

/// List image files directly inside `dir` as sorted `<prefix>/<name>` paths.
pub fn scan_images(dir: &Path, prefix: &str) -> Result<Vec<String>> {
    let prefix = prefix.trim_end_matches('/');
    let mut images = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
            continue;
        };
        if EXCLUDED.contains(&name) || !is_image(name) {
            continue;
        }
        images.push(if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        });
    }

    images.sort();
    Ok(images)
}

/// Write `images` as a pretty JSON array.
pub fn write_manifest(path: &Path, images: &[String]) -> Result<()> {
    let mut json = serde_json::to_string_pretty(images)?;
    json.push('\n');
    fs::write(path, json)?;
    info!(path = %path.display(), count = images.len(), "Wrote image manifest");
    Ok(())
}

fn is_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.gif", "favicon.ico", "notes.txt", "c.svg", "images.json"] {
            touch(dir.path(), name);
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let images = scan_images(dir.path(), DEFAULT_PREFIX).unwrap();
        assert_eq!(images, vec!["./img/a.gif", "./img/b.PNG", "./img/c.svg"]);
    }

    #[test]
    fn prefix_trailing_slash_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "hero.webp");
        assert_eq!(
            scan_images(dir.path(), "assets/chars/").unwrap(),
            vec!["assets/chars/hero.webp"]
        );
    }

    #[test]
    fn manifest_is_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        write_manifest(&path, &["./img/a.gif".to_string(), "./img/b.png".to_string()]).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[\n  \"./img/a.gif\",\n  \"./img/b.png\"\n]\n");
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_images(&dir.path().join("absent"), DEFAULT_PREFIX).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
