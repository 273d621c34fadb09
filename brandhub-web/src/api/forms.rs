//! Multipart form reading

use axum::extract::Multipart;
use std::collections::HashMap;

use crate::error::{ApiError, ApiResult};
use crate::services::UploadedFile;

/// Text fields and files of a multipart submission
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// A text field; absent when the form did not include it
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Take a file field out of the form
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// Read every part of a multipart body into memory
pub async fn read_multipart(mut multipart: Multipart) -> ApiResult<FormData> {
    let mut form = FormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Cannot read file '{}': {}", name, e)))?;
                form.files
                    .insert(name, UploadedFile::new(file_name, content_type, bytes.to_vec()));
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Cannot read field '{}': {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}
