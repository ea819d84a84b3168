// lib/src/history/attachment.rs

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;
use tokio::fs;

use crate::errors::Result;

/// Mime type used in the data URL, picked from the file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        Some("xml") => "application/xml",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Reads a document and encodes it as a data URL, ready to be stored in a
/// visit record.
pub async fn read_attachment(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await?;
    debug!("Read attachment {:?} ({} bytes)", path, bytes.len());
    Ok(encode_data_url(mime_type_for(path), &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pick_mime_from_extension() {
        assert_eq!(mime_type_for(Path::new("lab.PDF")), "application/pdf");
        assert_eq!(mime_type_for(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn should_encode_data_url() {
        assert_eq!(encode_data_url("application/pdf", b"%PDF"), "data:application/pdf;base64,JVBERg==");
    }

    #[tokio::test]
    async fn should_read_file_as_data_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("resultado.pdf");
        std::fs::write(&path, b"%PDF").unwrap();
        let url = read_attachment(&path).await.unwrap();
        assert_eq!(url, "data:application/pdf;base64,JVBERg==");
    }

    #[tokio::test]
    async fn should_fail_on_missing_file() {
        let missing = Path::new("/no/such/document.pdf");
        assert!(read_attachment(missing).await.is_err());
    }
}
