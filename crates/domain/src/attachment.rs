use crate::mail_form::MailFormError;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// File extensions accepted for bulk mail attachments
pub const ATTACHMENT_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".gif", ".jpeg", ".pdf", ".txt", ".docx", ".svg", ".pptx", ".ppt", ".doc",
    ".xlsx", ".xls", ".jfif", ".heic", ".heif", ".pages", ".bmp", ".tif", ".tiff",
];

/// Largest accepted attachment, in decoded bytes
pub const MAX_ATTACHMENT_SIZE: usize = 10 * 1024 * 1024;

/// A file sent along with a bulk mail. `content` is base64 encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

impl MailAttachment {
    pub fn new(filename: &str, content_type: &str, content: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: STANDARD.encode(content),
        }
    }

    fn extension(&self) -> Option<String> {
        let dot = self.filename.rfind('.')?;
        Some(self.filename[dot..].to_lowercase())
    }

    /// Checks the extension whitelist and the size limit and returns the
    /// decoded file content
    pub fn decode(&self) -> Result<Vec<u8>, MailFormError> {
        match self.extension() {
            Some(ext) if ATTACHMENT_EXTENSIONS.contains(&ext.as_str()) => (),
            _ => {
                return Err(MailFormError::AttachmentExtension(
                    self.filename.clone(),
                ))
            }
        }
        if !self.content_type.contains('/') {
            return Err(MailFormError::AttachmentContentType(
                self.content_type.clone(),
            ));
        }
        // Reject oversized content before decoding it
        if self.content.len() / 4 * 3 > MAX_ATTACHMENT_SIZE + 2 {
            return Err(MailFormError::AttachmentTooLarge);
        }
        let content = STANDARD
            .decode(self.content.trim())
            .map_err(|_| MailFormError::AttachmentEncoding)?;
        if content.len() > MAX_ATTACHMENT_SIZE {
            return Err(MailFormError::AttachmentTooLarge);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_whitelisted_files() {
        let attachment = MailAttachment::new("Program.PDF", "application/pdf", b"%PDF-1.4");
        assert_eq!(attachment.content, "JVBERi0xLjQ=");
        assert_eq!(attachment.decode(), Ok(b"%PDF-1.4".to_vec()));
    }

    #[test]
    fn rejects_other_extensions() {
        for filename in &["setup.exe", "archive.tar.gz", "README"] {
            let attachment = MailAttachment::new(filename, "application/octet-stream", b"x");
            assert_eq!(
                attachment.decode(),
                Err(MailFormError::AttachmentExtension(filename.to_string()))
            );
        }
    }

    #[test]
    fn rejects_broken_files() {
        let mut attachment = MailAttachment::new("notes.txt", "text/plain", b"notes");
        attachment.content = "not base64!".into();
        assert_eq!(attachment.decode(), Err(MailFormError::AttachmentEncoding));

        let attachment = MailAttachment::new("notes.txt", "plain", b"notes");
        assert_eq!(
            attachment.decode(),
            Err(MailFormError::AttachmentContentType("plain".into()))
        );
    }

    #[test]
    fn enforces_size_limit() {
        let at_limit = vec![0u8; MAX_ATTACHMENT_SIZE];
        let attachment = MailAttachment::new("scan.png", "image/png", &at_limit);
        assert_eq!(attachment.decode().map(|c| c.len()), Ok(MAX_ATTACHMENT_SIZE));

        let too_large = vec![0u8; MAX_ATTACHMENT_SIZE + 1];
        let attachment = MailAttachment::new("scan.png", "image/png", &too_large);
        assert_eq!(attachment.decode(), Err(MailFormError::AttachmentTooLarge));
    }
}
