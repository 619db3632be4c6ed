//! Bundled sample file and presigned download links.

use std::path::Path;
use std::time::SystemTime;

use bytes::Bytes;

use crate::clients::{ClientFactory, LinkRequest, ObjectLinker, SignatureVersion};
use crate::error::ApiError;
use crate::settings::Settings;

/// Spreadsheet shipped in the content root.
pub const SAMPLE_FILE_NAME: &str = "HelloDevWeek.xlsx";

/// MIME type the sample spreadsheet is served with.
pub const SAMPLE_CONTENT_TYPE: &str = "application/vnd.ms-excel";

/// Object the presigned link points at. It is expected to have been
/// uploaded to the bucket beforehand.
pub const LINKED_OBJECT_KEY: &str = "HelloDevWeek.txt";

/// A fully buffered file ready to be sent as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub bytes: Bytes,
    pub content_type: &'static str,
    pub file_name: &'static str,
}

impl FilePayload {
    /// `Content-Disposition` value suggesting the download file name.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

/// Read the sample spreadsheet from `content_root` into memory.
pub async fn read_sample_file(content_root: &Path) -> Result<FilePayload, ApiError> {
    let path = content_root.join(SAMPLE_FILE_NAME);

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| ApiError::Resource { path, source })?;

    Ok(FilePayload {
        bytes: Bytes::from(bytes),
        content_type: SAMPLE_CONTENT_TYPE,
        file_name: SAMPLE_FILE_NAME,
    })
}

/// Presign a 60 second download link to [`LINKED_OBJECT_KEY`] in the
/// configured bucket, issued at `now`.
pub async fn presigned_link<F>(
    factory: &F,
    settings: &Settings,
    now: SystemTime,
) -> Result<String, ApiError>
where
    F: ClientFactory + ?Sized,
{
    let bucket = settings.bucket()?;
    let storage = factory.storage_client(settings.region(), SignatureVersion::V4);

    let request = LinkRequest::new(bucket, LINKED_OBJECT_KEY, now);
    Ok(storage.presign_get(&request).await?)
}
