use crate::extract::{DocumentKind, ExtractError, TextExtractor};

/// Share of undecodable bytes above which the upload is treated as binary.
const MAX_INVALID_RATIO: f64 = 0.1;

/// Fallback for every suffix that is not `.pdf` or `.docx`: best-effort UTF-8
/// with invalid bytes dropped.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::PlainText
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        if bytes.contains(&0) {
            return Err(ExtractError::NotText);
        }

        let (text, dropped) = decode_dropping_invalid(bytes);
        if !bytes.is_empty() && dropped as f64 / bytes.len() as f64 > MAX_INVALID_RATIO {
            return Err(ExtractError::NotText);
        }
        Ok(text)
    }
}

/// Decodes UTF-8, skipping invalid sequences. Returns the text and the number
/// of bytes that were dropped.
fn decode_dropping_invalid(mut bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0;

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                return (text, dropped);
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                // valid_up_to() guarantees this prefix is UTF-8
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let skip = e.error_len().unwrap_or(rest.len());
                dropped += skip;
                bytes = &rest[skip..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8_passes_through() {
        let text = PlainTextExtractor.extract("Zoë — Développeuse".as_bytes()).unwrap();
        assert_eq!(text, "Zoë — Développeuse");
    }

    #[test]
    fn test_stray_invalid_bytes_are_dropped() {
        let mut bytes = b"Experienced engineer with ten years in backend systems".to_vec();
        bytes.insert(11, 0xff);
        let text = PlainTextExtractor.extract(&bytes).unwrap();
        assert_eq!(text, "Experienced engineer with ten years in backend systems");
    }

    #[test]
    fn test_truncated_multibyte_tail_is_dropped() {
        let mut bytes = "Senior engineer, Zürich office, 2019 to present".as_bytes().to_vec();
        bytes.extend_from_slice(&[0xc3]);
        let (text, dropped) = decode_dropping_invalid(&bytes);
        assert_eq!(text, "Senior engineer, Zürich office, 2019 to present");
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_mostly_invalid_bytes_are_not_text() {
        let bytes = [0x89u8, 0xff, 0xfe, 0x81, b'a', 0x9f];
        assert!(matches!(
            PlainTextExtractor.extract(&bytes),
            Err(ExtractError::NotText)
        ));
    }

    #[test]
    fn test_nul_bytes_are_not_text() {
        assert!(matches!(
            PlainTextExtractor.extract(b"abc\0def"),
            Err(ExtractError::NotText)
        ));
    }

    #[test]
    fn test_empty_input_is_empty_text() {
        assert_eq!(PlainTextExtractor.extract(b"").unwrap(), "");
    }
}
