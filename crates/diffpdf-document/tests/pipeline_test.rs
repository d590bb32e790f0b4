// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end comparison runs over in-memory documents, writing real PDF and
// PNG files into a temporary directory.

use std::path::Path;

use diffpdf_core::{Color, ComparisonMode, DiffConfig, Margins, OutputFormat, PagePair, RectF};
use diffpdf_document::pipeline::compute_regions;
use diffpdf_document::{Differ, MemoryDocument, MemoryPage, PdfProbe};

fn letter_with_text(text: &str) -> MemoryPage {
    MemoryPage::letter()
        .with_text(RectF::new(72.0, 72.0, 200.0, 14.0), text)
        .with_text(RectF::new(72.0, 100.0, 150.0, 14.0), "second line")
}

fn document(name: &str, pages: Vec<MemoryPage>) -> MemoryDocument {
    pages
        .into_iter()
        .fold(MemoryDocument::new(name), MemoryDocument::with_page)
}

fn named_in(dir: &Path, file: &str) -> String {
    dir.join(file).display().to_string()
}

#[test]
fn shifted_image_is_a_visual_difference_confined_to_the_margin_area() {
    let left = document(
        "left.pdf",
        vec![letter_with_text("same").with_rect(RectF::new(300.0, 300.0, 40.0, 40.0), Color::BLACK)],
    );
    let right = document(
        "right.pdf",
        vec![letter_with_text("same").with_rect(RectF::new(301.0, 300.0, 40.0, 40.0), Color::BLACK)],
    );
    let margins = Margins {
        top: 36,
        left: 36,
        right: 36,
        bottom: 36,
    };
    let config = DiffConfig::builder()
        .mode(ComparisonMode::Visual)
        .output("unused.pdf")
        .margins(margins)
        .build()
        .unwrap();

    let differ = Differ::new(&config, &left, &right);
    let statuses = differ.generate_diff_statuses().unwrap();
    assert_eq!(statuses, vec![PagePair::new(0, 0, true)]);

    let input = differ.load_pair(statuses[0]).unwrap();
    let inclusion = input.inclusion.expect("margins give an inclusion box").to_rect_f();
    let (left_regions, right_regions) = compute_regions(&input, &config);
    assert!(!left_regions.is_empty());
    assert_eq!(left_regions, right_regions);
    assert!(left_regions.iter().all(|region| inclusion.contains(region)));
}

#[test]
fn text_change_wins_even_when_pixels_also_differ() {
    let left = document("l.pdf", vec![letter_with_text("alpha")]);
    let right = document(
        "r.pdf",
        vec![letter_with_text("omega").with_rect(RectF::new(400.0, 400.0, 30.0, 30.0), Color::BLACK)],
    );
    let config = DiffConfig::builder()
        .mode(ComparisonMode::Visual)
        .output("unused.pdf")
        .build()
        .unwrap();
    let statuses = Differ::new(&config, &left, &right)
        .generate_diff_statuses()
        .unwrap();
    assert_eq!(statuses, vec![PagePair::new(0, 0, false)]);
}

#[test]
fn combined_pdf_has_one_page_per_differing_pair() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("diff.pdf");
    let left = document(
        "l.pdf",
        vec![
            letter_with_text("one"),
            letter_with_text("two"),
            letter_with_text("three"),
        ],
    );
    let right = document(
        "r.pdf",
        vec![
            letter_with_text("uno"),
            letter_with_text("two"),
            letter_with_text("tres"),
        ],
    );
    let config = DiffConfig::builder()
        .output(&output)
        .zoom(1)
        .build()
        .unwrap();

    let summary = Differ::new(&config, &left, &right).run().unwrap();
    assert_eq!(
        summary.pairs,
        vec![PagePair::new(0, 0, false), PagePair::new(2, 2, false)]
    );
    assert_eq!(summary.report.written, vec![output.clone()]);
    assert_eq!(PdfProbe::open(&output).unwrap().page_count(), 2);
}

fn differing_pair(dir: &Path) -> (MemoryDocument, MemoryDocument) {
    (
        document(
            &named_in(dir, "a.pdf"),
            vec![letter_with_text("before"), letter_with_text("kept")],
        ),
        document(
            &named_in(dir, "b.pdf"),
            vec![letter_with_text("after"), letter_with_text("kept")],
        ),
    )
}

#[test]
fn combined_pdf_is_reproducible() {
    let run_into = |dir: &Path| {
        let output = dir.join("diff.pdf");
        let (left, right) = differing_pair(dir);
        let config = DiffConfig::builder()
            .output(&output)
            .zoom(1)
            .build()
            .unwrap();
        Differ::new(&config, &left, &right).run().unwrap();
        std::fs::read(&output).unwrap()
    };
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    assert_eq!(run_into(first.path()), run_into(second.path()));
}

#[test]
fn separate_pdfs_are_reproducible() {
    let run_into = |dir: &Path| {
        let (left, right) = differing_pair(dir);
        let config = DiffConfig::builder()
            .print_separate(true)
            .zoom(1)
            .build()
            .unwrap();
        let summary = Differ::new(&config, &left, &right).run().unwrap();
        assert_eq!(summary.report.written.len(), 2);
        summary
            .report
            .written
            .iter()
            .map(|path| std::fs::read(path).unwrap())
            .collect::<Vec<_>>()
    };
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    assert_eq!(run_into(first.path()), run_into(second.path()));
}

#[test]
fn image_output_is_numbered_and_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("diff.png");
    let left = document("l.pdf", vec![letter_with_text("before")]);
    let right = document("r.pdf", vec![letter_with_text("after")]);
    let config = DiffConfig::builder()
        .output(&base)
        .output_format(OutputFormat::Png)
        .zoom(1)
        .build()
        .unwrap();

    let differ = Differ::new(&config, &left, &right);
    let first = differ.run().unwrap();
    let page = dir.path().join("diff-1.png");
    assert_eq!(first.report.written, vec![page.clone()]);
    let bytes = std::fs::read(&page).unwrap();

    differ.run().unwrap();
    assert_eq!(std::fs::read(&page).unwrap(), bytes);

    let decoded = image::open(&page).unwrap();
    assert_eq!(decoded.width(), 2 * 612);
    assert_eq!(decoded.height(), 792);
}

#[test]
fn separate_mode_writes_one_output_per_document() {
    let dir = tempfile::tempdir().unwrap();
    let left = document(&named_in(dir.path(), "a.pdf"), vec![letter_with_text("left")]);
    let right = document(&named_in(dir.path(), "b.pdf"), vec![letter_with_text("right")]);
    let config = DiffConfig::builder()
        .print_separate(true)
        .zoom(1)
        .build()
        .unwrap();

    let summary = Differ::new(&config, &left, &right).run().unwrap();
    assert!(summary.report.is_success());
    assert_eq!(
        summary.report.written,
        vec![dir.path().join("a.pdf.diff.pdf"), dir.path().join("b.pdf.diff.pdf")]
    );
}

#[test]
fn identical_documents_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("diff.pdf");
    let doc = document("same.pdf", vec![letter_with_text("same"), letter_with_text("pages")]);
    let config = DiffConfig::builder().output(&output).build().unwrap();

    let summary = Differ::new(&config, &doc, &doc).run().unwrap();
    assert!(summary.pairs.is_empty());
    assert!(summary.report.written.is_empty());
    assert!(!output.exists());
}

#[test]
fn page_ranges_pair_in_lock_step() {
    let left = document(
        "l.pdf",
        vec![letter_with_text("a"), letter_with_text("b"), letter_with_text("c")],
    );
    let right = document(
        "r.pdf",
        vec![letter_with_text("x"), letter_with_text("y"), letter_with_text("c")],
    );
    let config = DiffConfig::builder()
        .output("unused.pdf")
        .pages("3,1", "3-3")
        .build()
        .unwrap();
    let statuses = Differ::new(&config, &left, &right)
        .generate_diff_statuses()
        .unwrap();
    // Only (3, 3) is paired; it is identical, so nothing differs.
    assert!(statuses.is_empty());
}
