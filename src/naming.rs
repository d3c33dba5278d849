//! Output file naming.
//!
//! A crop either overwrites its source or writes a sibling file whose stem
//! carries a suffix:
//! - `scans/page.jpg` + `""` → `scans/page.jpg` (in place)
//! - `scans/page.jpg` + `-c` → `scans/page-c.jpg`
//! - `scans/README` + `-c` → `scans/README-c`
//!
//! Only the last extension moves: `photo.tar.jpg` + `-c` → `photo.tar-c.jpg`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Build the output path for `input`, inserting `suffix` before the extension.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    if suffix.is_empty() {
        return input.to_path_buf();
    }
    let Some(stem) = input.file_stem() else {
        // No file name (e.g. `..`); leave the path alone
        return input.to_path_buf();
    };

    let mut name = OsString::from(stem);
    name.push(suffix);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(input: &str, suffix: &str) -> PathBuf {
        output_path(Path::new(input), suffix)
    }

    #[test]
    fn empty_suffix_overwrites() {
        assert_eq!(derive("scans/page.jpg", ""), PathBuf::from("scans/page.jpg"));
    }

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(derive("scans/page.jpg", "-c"), PathBuf::from("scans/page-c.jpg"));
    }

    #[test]
    fn bare_file_name() {
        assert_eq!(derive("page.PNG", "_crop"), PathBuf::from("page_crop.PNG"));
    }

    #[test]
    fn absolute_directory_is_kept() {
        assert_eq!(
            derive("/home/me/scans/a.tif", "-cropped"),
            PathBuf::from("/home/me/scans/a-cropped.tif")
        );
    }

    #[test]
    fn no_extension() {
        assert_eq!(derive("scans/README", "-c"), PathBuf::from("scans/README-c"));
    }

    #[test]
    fn only_last_extension_moves() {
        assert_eq!(
            derive("photo.tar.jpg", "-c"),
            PathBuf::from("photo.tar-c.jpg")
        );
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(derive("dir/.hidden", "-c"), PathBuf::from("dir/.hidden-c"));
    }

    #[test]
    fn suffix_with_spaces_is_verbatim() {
        assert_eq!(derive("a.jpg", " (copy)"), PathBuf::from("a (copy).jpg"));
    }
}
