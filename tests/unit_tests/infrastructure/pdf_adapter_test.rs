use cleverbot::application::ports::{FileLoader, FileLoaderError};
use cleverbot::domain::Document;
use cleverbot::infrastructure::text_processing::PdfAdapter;

fn pdf_document(filename: &str, data: &[u8]) -> Document {
    Document::new(
        filename.to_string(),
        "application/pdf".to_string(),
        data.len() as u64,
    )
}

#[tokio::test]
async fn given_valid_pdf_bytes_when_extracting_then_returns_text_of_every_text_page() {
    let adapter = PdfAdapter::new();
    let pdf_bytes = include_bytes!("../../fixtures/sample.pdf");
    let document = pdf_document("sample.pdf", pdf_bytes);

    let text = adapter.extract_text(pdf_bytes, &document).await.unwrap();

    assert!(text.contains("Revenue"));
    assert!(text.contains("Cost"));
    assert!(text.find("Revenue") < text.find("Cost"));
}

#[tokio::test]
async fn given_pdf_without_text_when_extracting_then_returns_empty_string() {
    let adapter = PdfAdapter::new();
    let pdf_bytes = include_bytes!("../../fixtures/empty.pdf");
    let document = pdf_document("empty.pdf", pdf_bytes);

    let text = adapter.extract_text(pdf_bytes, &document).await.unwrap();

    assert!(text.is_empty());
}

#[tokio::test]
async fn given_corrupt_bytes_when_extracting_pdf_then_returns_unreadable_document() {
    let adapter = PdfAdapter::new();
    let garbage = b"not a pdf at all";
    let document = pdf_document("corrupt.pdf", garbage);

    let result = adapter.extract_text(garbage, &document).await;

    assert!(matches!(result, Err(FileLoaderError::UnreadableDocument(_))));
}

#[tokio::test]
async fn given_non_pdf_content_type_when_extracting_then_returns_unsupported() {
    let adapter = PdfAdapter::new();
    let data = b"some data";
    let document = Document::new(
        "notes.txt".to_string(),
        "text/plain".to_string(),
        data.len() as u64,
    );

    let result = adapter.extract_text(data, &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}

#[test]
fn given_blank_pages_when_joining_then_they_are_skipped() {
    let pages = vec![
        "Revenue: 100".to_string(),
        "   \n".to_string(),
        String::new(),
        "Cost: 40".to_string(),
    ];

    assert_eq!(PdfAdapter::join_pages(pages), "Revenue: 100\nCost: 40");
}

#[test]
fn given_only_blank_pages_when_joining_then_empty() {
    let pages = vec![" ".to_string(), String::new()];

    assert!(PdfAdapter::join_pages(pages).is_empty());
}
