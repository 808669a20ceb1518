//! Handler for `images scan`.

use serde_json::json;

use crate::adapter::inbound::cli::command::ImagesScanArgs;
use crate::adapter::inbound::cli::output;
use crate::application::catalog::{scan_images, write_manifest, MANIFEST_FILE};
use crate::error::Result;

/// Execute `images scan`.
pub fn execute_scan(args: &ImagesScanArgs) -> Result<()> {
    let images = scan_images(&args.dir, &args.prefix)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| args.dir.join(MANIFEST_FILE));
    write_manifest(&path, &images)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "images scan",
            "path": path.display().to_string(),
            "images": images,
        }));
        return Ok(());
    }

    if images.is_empty() {
        output::warning(&format!("no images found in {}", args.dir.display()));
    }
    output::action_done(
        "Wrote",
        &format!("{} ({} images)", path.display(), images.len()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_writes_manifest_next_to_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hero.png"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let args = ImagesScanArgs {
            dir: dir.path().to_path_buf(),
            prefix: "./img".into(),
            output: None,
        };
        execute_scan(&args).unwrap();

        let written = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let images: Vec<String> = serde_json::from_str(&written).unwrap();
        assert_eq!(images, vec!["./img/hero.png"]);
    }
}
