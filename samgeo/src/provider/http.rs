//! HTTP client abstraction for testability

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};

use super::types::ProviderError;

/// Default request timeout for tile downloads.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A file sent as one field of a `multipart/form-data` request.
#[derive(Debug, Clone)]
pub struct MultipartFile {
    /// Form field name
    pub field: String,
    /// File name reported to the server
    pub file_name: String,
    /// MIME type of the content
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MultipartFile {
    /// Creates a PNG file field.
    pub fn png(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: "image/png".to_string(),
            bytes,
        }
    }
}

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;

    /// Performs an HTTP POST with a single multipart file field and returns
    /// the response body.
    fn post_multipart(&self, url: &str, file: MultipartFile) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
    }

    /// Creates a new ReqwestClient with a custom timeout; `None` waits forever.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("samgeo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    fn read_body(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<Vec<u8>, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e)))?;

        Self::read_body(url, response)
    }

    fn post_multipart(&self, url: &str, file: MultipartFile) -> Result<Vec<u8>, ProviderError> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)
            .map_err(|e| ProviderError::HttpError(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part(file.field, part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e)))?;

        Self::read_body(url, response)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock HTTP client for testing
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, ProviderError>,
        pub requests: Mutex<Vec<String>>,
        pub uploads: Mutex<Vec<MultipartFile>>,
    }

    impl MockHttpClient {
        pub fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
                uploads: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.response.clone()
        }

        fn post_multipart(
            &self,
            url: &str,
            file: MultipartFile,
        ) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.uploads.lock().unwrap().push(file);
            self.response.clone()
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::new(Ok(vec![1, 2, 3, 4]));

        let result = mock.get("http://example.com");
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient::new(Err(ProviderError::HttpError("Test error".to_string())));

        let result = mock.get("http://example.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_mock_client_records_upload() {
        let mock = MockHttpClient::new(Ok(vec![9]));
        let file = MultipartFile::png("file", "mosaic.png", vec![1, 2]);

        mock.post_multipart("http://example.com/embedding", file)
            .unwrap();

        let uploads = mock.uploads.lock().unwrap();
        assert_eq!(uploads[0].field, "file");
        assert_eq!(uploads[0].mime, "image/png");
    }

    #[test]
    fn test_reqwest_client_builds_without_timeout() {
        assert!(ReqwestClient::with_timeout(None).is_ok());
    }
}
