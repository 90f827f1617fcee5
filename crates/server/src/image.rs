//! Wire image payloads to engine image inputs.

use api_types::image::ImagePayload;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use engine::{FileUpload, ImageInput};

use crate::ServerError;

pub fn decode_image(payload: ImagePayload) -> Result<ImageInput, ServerError> {
    match payload {
        ImagePayload::Url { url } => Ok(ImageInput::Url(url)),
        ImagePayload::File {
            file_name,
            content_type,
            data_base64,
        } => {
            let bytes = STANDARD
                .decode(data_base64.as_bytes())
                .map_err(|err| ServerError::Generic(format!("invalid image data: {err}")))?;
            Ok(ImageInput::File(FileUpload {
                file_name,
                content_type,
                bytes,
            }))
        }
    }
}

pub fn decode_optional(payload: Option<ImagePayload>) -> Result<Option<ImageInput>, ServerError> {
    payload.map(decode_image).transpose()
}
