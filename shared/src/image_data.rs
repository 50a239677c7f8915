use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Prefix of the file name offered when saving a result.
pub const DOWNLOAD_PREFIX: &str = "upscaled_";
const FALLBACK_FILE_NAME: &str = "image.png";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is empty")]
    Empty,
    #[error("response is not a recognised image: {0}")]
    UnknownFormat(#[source] image::ImageError),
}

/// Upscaled image ready to be displayed or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpscaledImage {
    pub data_uri: String,
    pub mime_type: String,
    pub byte_len: usize,
}

impl UpscaledImage {
    /// Decodes a binary response body.
    ///
    /// The format is sniffed from the magic bytes. When sniffing fails an
    /// `image/*` content type from the response is trusted instead.
    pub fn from_bytes(bytes: &[u8], content_type: Option<&str>) -> Result<Self, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mime_type = match image::guess_format(bytes) {
            Ok(format) => format.to_mime_type().to_string(),
            Err(e) => match content_type.and_then(image_mime) {
                Some(mime) => mime,
                None => return Err(DecodeError::UnknownFormat(e)),
            },
        };

        Ok(Self {
            data_uri: encode_data_uri(&mime_type, bytes),
            mime_type,
            byte_len: bytes.len(),
        })
    }
}

fn image_mime(content_type: &str) -> Option<String> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    mime.starts_with("image/").then_some(mime)
}

pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// File name for saving the result of an upscaled original.
pub fn download_file_name(original: Option<&str>) -> String {
    let name = original
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_FILE_NAME);
    format!("{}{}", DOWNLOAD_PREFIX, name)
}
