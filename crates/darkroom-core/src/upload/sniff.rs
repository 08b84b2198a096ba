//! MIME type detection for files read from disk.
//!
//! Browsers hand over a declared MIME type with each file; on disk we derive
//! one from the magic bytes, then from the extension.

use std::path::Path;

/// Fallback when neither the header nor the extension is recognized.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Detect a MIME type for `path` whose contents start with `header`.
pub fn detect_mime(path: &Path, header: &[u8]) -> &'static str {
    sniff_header(header)
        .or_else(|| mime_from_extension(path))
        .unwrap_or(UNKNOWN_MIME)
}

/// Match the leading bytes against known image signatures.
pub fn sniff_header(header: &[u8]) -> Option<&'static str> {
    if header.len() < 4 {
        return None;
    }

    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if header.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some("image/png");
    }
    if header.starts_with(b"GIF8") {
        return Some("image/gif");
    }
    // RIFF....WEBP; RIFF alone is also WAV/AVI
    if header.starts_with(b"RIFF") && header.len() >= 12 && &header[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if header.starts_with(b"BM") {
        return Some("image/bmp");
    }
    // TIFF: II or MM followed by version 42
    if header.starts_with(&[b'I', b'I', 0x2A, 0x00]) || header.starts_with(&[b'M', b'M', 0x00, 0x2A])
    {
        return Some("image/tiff");
    }
    // ISO-BMFF: ftyp box at offset 4, brand at 8..12
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        return match &header[8..12] {
            b"avif" | b"avis" => Some("image/avif"),
            b"heic" | b"heix" | b"mif1" | b"msf1" => Some("image/heic"),
            _ => None,
        };
    }

    None
}

/// Map a file extension to a MIME type.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" | "heif" => "image/heic",
        "avif" => "image/avif",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_jpeg() {
        let header = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(sniff_header(&header), Some("image/jpeg"));
    }

    #[test]
    fn test_sniff_png() {
        let header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(sniff_header(&header), Some("image/png"));
    }

    #[test]
    fn test_sniff_webp_needs_brand() {
        let webp = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'E', b'B', b'P'];
        assert_eq!(sniff_header(&webp), Some("image/webp"));

        let wav = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'A', b'V', b'E'];
        assert_eq!(sniff_header(&wav), None);
    }

    #[test]
    fn test_sniff_tiff_needs_version() {
        assert_eq!(sniff_header(&[b'I', b'I', 0x2A, 0x00]), Some("image/tiff"));
        assert_eq!(sniff_header(&[b'M', b'M', 0x00, 0x2A]), Some("image/tiff"));
        assert_eq!(sniff_header(&[b'I', b'I', 0x00, 0x00]), None);
    }

    #[test]
    fn test_sniff_heic() {
        let header = [0, 0, 0, 0x18, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c'];
        assert_eq!(sniff_header(&header), Some("image/heic"));
    }

    #[test]
    fn test_sniff_short_header() {
        assert_eq!(sniff_header(&[0xFF, 0xD8]), None);
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        let text = b"hello world";
        assert_eq!(detect_mime(Path::new("notes.txt"), text), "text/plain");
        assert_eq!(detect_mime(Path::new("photo.JPG"), text), "image/jpeg");
        assert_eq!(detect_mime(Path::new("blob.xyz"), text), UNKNOWN_MIME);
    }

    #[test]
    fn test_detect_prefers_header() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_mime(Path::new("misnamed.jpg"), &png), "image/png");
    }
}
