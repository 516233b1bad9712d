//! 上传文件的内容类型识别
//!
//! 扩展名必须与文件头的魔术字节一致，识别结果同时作为下载时的 Content-Type。

/// 根据扩展名与魔术字节确定内容类型
///
/// `extension` 含点号（如 ".pdf"），大小写不敏感。
/// 魔术字节与扩展名不符或扩展名未知时返回 `None`。
pub fn detect_content_type(data: &[u8], extension: &str) -> Option<&'static str> {
    if data.is_empty() {
        return None;
    }

    let ext = extension.to_ascii_lowercase();
    let (matches, mime) = match ext.as_str() {
        ".png" => (
            data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            "image/png",
        ),
        ".jpg" | ".jpeg" => (data.starts_with(&[0xFF, 0xD8, 0xFF]), "image/jpeg"),
        ".gif" => (
            data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
            "image/gif",
        ),
        ".webp" => (
            data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",
            "image/webp",
        ),
        ".pdf" => (data.starts_with(b"%PDF"), "application/pdf"),
        // OOXML 与 zip 同为 ZIP 容器
        ".docx" => (
            data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
        ".xlsx" => (
            data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ),
        ".pptx" => (
            data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ),
        ".zip" => (data.starts_with(&[0x50, 0x4B, 0x03, 0x04]), "application/zip"),
        // 纯文本不检查魔术字节，但拒绝含 NUL 的二进制内容
        ".txt" => (!data.contains(&0), "text/plain; charset=utf-8"),
        _ => (false, ""),
    };

    matches.then_some(mime)
}

/// 校验魔术字节是否与扩展名匹配
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    detect_content_type(data, extension).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        let pdf_header = b"%PDF-1.7\n";
        assert_eq!(
            detect_content_type(pdf_header, ".PDF"),
            Some("application/pdf")
        );
        assert!(!validate_magic_bytes(pdf_header, ".docx"));
    }

    #[test]
    fn test_image_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0];
        assert!(validate_magic_bytes(&png_header, ".png"));
        assert!(!validate_magic_bytes(&png_header, ".jpg"));
        assert_eq!(detect_content_type(&jpeg_header, ".jpeg"), Some("image/jpeg"));
    }

    #[test]
    fn test_office_documents_share_zip_header() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip_header, ".docx"));
        assert!(validate_magic_bytes(&zip_header, ".xlsx"));
        assert_eq!(detect_content_type(&zip_header, ".zip"), Some("application/zip"));
    }

    #[test]
    fn test_text_rejects_binary() {
        assert!(validate_magic_bytes(b"Read chapter 3 and answer", ".txt"));
        assert!(!validate_magic_bytes(b"MZ\0\0binary", ".txt"));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".pdf"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }
}
