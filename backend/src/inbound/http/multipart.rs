//! Collect a `multipart/form-data` body into text fields and files.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::StreamExt as _;
use tracing::debug;

use crate::domain::{Error, FileUpload};

/// Text fields and files of one submission, keyed by field name.
///
/// Browsers send an empty part for a file input left blank; those parts
/// are dropped so the field reads as absent.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, FileUpload>,
}

impl MultipartForm {
    /// Read every part, failing once the total size exceeds `limit` bytes.
    pub async fn read(mut payload: Multipart, limit: usize) -> Result<Self, Error> {
        let mut form = Self::default();
        let mut total = 0usize;
        while let Some(item) = payload.next().await {
            let mut field =
                item.map_err(|err| Error::invalid_request(format!("malformed form body: {err}")))?;
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            let file_name = field
                .content_disposition()
                .and_then(|disposition| disposition.get_filename())
                .map(str::to_owned);
            let content_type = field.content_type().map(ToString::to_string);

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk
                    .map_err(|err| Error::invalid_request(format!("malformed form body: {err}")))?;
                total += chunk.len();
                if total > limit {
                    return Err(Error::invalid_request(format!(
                        "form body exceeds the {limit} byte limit"
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            match file_name {
                Some(file_name) if file_name.is_empty() && bytes.is_empty() => {}
                Some(file_name) => {
                    debug!(field = %name, %file_name, size = bytes.len(), "file part received");
                    form.files
                        .insert(name, FileUpload::new(file_name, content_type, bytes));
                }
                None => {
                    let text = String::from_utf8(bytes).map_err(|_| {
                        Error::invalid_request(format!("field {name} is not valid UTF-8"))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    /// Owned copy of a text field.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Remove and return a file part.
    pub fn take_file(&mut self, name: &str) -> Option<FileUpload> {
        self.files.remove(name)
    }
}
