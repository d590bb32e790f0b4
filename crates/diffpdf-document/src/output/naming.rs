// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output file naming.

use std::path::{Path, PathBuf};

use diffpdf_core::OutputFormat;

/// `<source>.diff.<ext>`, the per-document output of separate mode.
pub fn separate_path(source: &Path, format: OutputFormat) -> PathBuf {
    let mut name = source.as_os_str().to_os_string();
    name.push(".diff.");
    name.push(format.name());
    PathBuf::from(name)
}

/// The `n`th (1-based) image of a per-page image output: `-n` is inserted
/// before the last `.` of the file name, or `-n.png` appended when the name
/// has no `.`.
pub fn numbered_image_path(base: &Path, n: usize) -> PathBuf {
    let file_name = base
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let numbered = match file_name.rfind('.') {
        Some(dot) => format!("{}-{}{}", &file_name[..dot], n, &file_name[dot..]),
        None => format!("{}-{}.png", file_name, n),
    };
    base.with_file_name(numbered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separate_outputs_append_diff_extension() {
        assert_eq!(
            separate_path(Path::new("docs/a.pdf"), OutputFormat::Pdf),
            PathBuf::from("docs/a.pdf.diff.pdf")
        );
        assert_eq!(
            separate_path(Path::new("b.pdf"), OutputFormat::Png),
            PathBuf::from("b.pdf.diff.png")
        );
    }

    #[test]
    fn counter_goes_before_the_last_dot() {
        assert_eq!(
            numbered_image_path(Path::new("out/diff.png"), 3),
            PathBuf::from("out/diff-3.png")
        );
        assert_eq!(
            numbered_image_path(Path::new("a.pdf.diff.png"), 1),
            PathBuf::from("a.pdf.diff-1.png")
        );
    }

    #[test]
    fn counter_and_extension_appended_without_a_dot() {
        assert_eq!(
            numbered_image_path(Path::new("out/diff"), 12),
            PathBuf::from("out/diff-12.png")
        );
    }

    #[test]
    fn dots_in_directories_are_not_used() {
        assert_eq!(
            numbered_image_path(Path::new("v1.2/report"), 1),
            PathBuf::from("v1.2/report-1.png")
        );
    }
}
