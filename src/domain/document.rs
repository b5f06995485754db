use super::DocumentId;

const PDF_MIME: &str = "application/pdf";
const GENERIC_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl Document {
    pub fn new(filename: String, mime_type: String, size_bytes: u64) -> Self {
        Self {
            id: DocumentId::new(),
            filename,
            mime_type,
            size_bytes,
        }
    }

    /// Browsers sometimes send PDFs as a generic binary upload, so the
    /// extension is accepted in that case.
    pub fn is_pdf(&self) -> bool {
        let mime = self.mime_type.to_lowercase();
        if mime == PDF_MIME {
            return true;
        }
        (mime == GENERIC_MIME || mime.is_empty())
            && self.filename.to_lowercase().ends_with(".pdf")
    }
}

/// Text extracted from the most recent upload of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub document_id: DocumentId,
    pub filename: String,
    pub text: String,
}

impl LoadedDocument {
    pub fn new(document: &Document, text: String) -> Self {
        Self {
            document_id: document.id,
            filename: document.filename.clone(),
            text,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
