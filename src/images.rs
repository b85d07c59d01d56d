//! Concept image intake: a one-shot snapshot of the input directory and the
//! content-host URLs the remote service fetches images from.

use std::path::Path;

use crate::error::Result;

/// Extensions accepted as concept images (matched case-insensitively).
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg"];

/// List the image file names in `dir`, sorted. The listing is a snapshot
/// taken at batch start, not a live watch; files appearing later belong to
/// the next run.
pub fn list_image_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if has_image_extension(name) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|want| ext.eq_ignore_ascii_case(want))
        })
}

/// URL under the content host where the remote service can fetch the image.
pub fn remote_image_url(base_url: &str, file_name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), file_name)
}
