use cleverbot::domain::{Document, LoadedDocument};

#[test]
fn given_pdf_mime_when_checking_type_then_is_pdf() {
    let document = Document::new("report.bin".to_string(), "application/pdf".to_string(), 10);

    assert!(document.is_pdf());
}

#[test]
fn given_generic_mime_with_pdf_extension_when_checking_type_then_is_pdf() {
    let document = Document::new(
        "Report.PDF".to_string(),
        "application/octet-stream".to_string(),
        10,
    );

    assert!(document.is_pdf());
}

#[test]
fn given_text_mime_when_checking_type_then_is_not_pdf() {
    let document = Document::new("notes.pdf".to_string(), "text/plain".to_string(), 10);

    assert!(!document.is_pdf());
}

#[test]
fn given_whitespace_only_text_when_loading_then_has_no_text() {
    let document = Document::new("scan.pdf".to_string(), "application/pdf".to_string(), 10);

    let loaded = LoadedDocument::new(&document, "  \n ".to_string());

    assert!(!loaded.has_text());
    assert_eq!(loaded.document_id, document.id);
    assert_eq!(loaded.filename, "scan.pdf");
}
