use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const VALID_EXTS: [&str; 3] = ["jpg", "png", "jpeg"];

/// Files directly inside `dir`, sorted by name.
pub fn get_all_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// A non-empty file with an image extension.
pub fn is_valid_image(file_path: &Path) -> bool {
    let ext_valid = match file_path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => VALID_EXTS.contains(&ext.to_lowercase().as_str()),
        None => false,
    };

    let size_valid = match fs::metadata(file_path) {
        Ok(metadata) => metadata.len() != 0,
        Err(_) => false,
    };

    ext_valid && size_valid
}

/// Expand directories into the valid images they contain; plain file
/// arguments are passed through unchanged.
pub fn expand_image_args(args: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for arg in args {
        if arg.is_dir() {
            images.extend(
                get_all_files(arg)?
                    .into_iter()
                    .filter(|path| is_valid_image(path)),
            );
        } else {
            images.push(arg.clone());
        }
    }
    Ok(images)
}
