#[cfg(test)]
mod tests {
    use crate::download::{DownloadOptions, HttpClient, HttpFileDownloader, HttpResponse};
    use crate::error::{KeycloakError, Result};
    use std::io::{Cursor, Read};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::tempdir;

    // Mock implementations for testing
    struct MockHttpClient {
        responses: Vec<MockResponse>,
        request_count: Arc<Mutex<usize>>,
    }

    struct MockResponse {
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }

    impl MockHttpClient {
        fn new(responses: Vec<MockResponse>) -> Self {
            Self {
                responses,
                request_count: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, _url: &str) -> Result<Box<dyn HttpResponse>> {
            let mut count = self.request_count.lock().unwrap();
            if *count >= self.responses.len() {
                return Err(KeycloakError::NetworkError(
                    "No more mock responses".to_string(),
                ));
            }

            let response = &self.responses[*count];
            *count += 1;

            Ok(Box::new(MockHttpResponse {
                status: response.status,
                headers: response.headers.clone(),
                body: Cursor::new(response.body.clone()),
            }))
        }

        fn set_timeout(&mut self, _timeout: Option<Duration>) {
            // Mock implementation - no-op
        }
    }

    struct MockHttpResponse {
        status: u16,
        headers: Vec<(String, String)>,
        body: Cursor<Vec<u8>>,
    }

    impl Read for MockHttpResponse {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.body.read(buf)
        }
    }

    impl HttpResponse for MockHttpResponse {
        fn status(&self) -> u16 {
            self.status
        }

        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    fn ok_response(body: &[u8]) -> MockResponse {
        MockResponse {
            status: 200,
            headers: vec![("Content-Length".to_string(), body.len().to_string())],
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_download_with_mock_client() {
        let test_content = b"Hello, Keycloak!";
        let mock_client = MockHttpClient::new(vec![ok_response(test_content)]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();
        let dest_path = temp_dir.path().join("keycloak.zip");

        let result = downloader.download(
            "http://example.com/keycloak.zip",
            &dest_path,
            &DownloadOptions::default(),
        );

        assert_eq!(result.unwrap(), dest_path);
        assert_eq!(std::fs::read(&dest_path).unwrap(), test_content);
    }

    #[test]
    fn test_download_with_checksum_validation() {
        let mock_client = MockHttpClient::new(vec![ok_response(b"Hello, World!")]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();
        let dest_path = temp_dir.path().join("keycloak.zip");

        let options = DownloadOptions {
            checksum: Some("0a0a9f2a6772942557ab5355d76af442f8f65e01".to_string()),
            ..Default::default()
        };

        let result = downloader.download("http://example.com/keycloak.zip", &dest_path, &options);

        assert!(result.is_ok());
    }

    #[test]
    fn test_download_with_invalid_checksum_leaves_no_file() {
        let mock_client = MockHttpClient::new(vec![ok_response(b"Hello, World!")]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();
        let dest_path = temp_dir.path().join("keycloak.zip");

        let options = DownloadOptions {
            checksum: Some("0000000000000000000000000000000000000000".to_string()),
            ..Default::default()
        };

        let result = downloader.download("http://example.com/keycloak.zip", &dest_path, &options);

        assert!(matches!(
            result,
            Err(KeycloakError::ChecksumMismatch { .. })
        ));
        assert!(!dest_path.exists());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_download_with_http_error() {
        let mock_client = MockHttpClient::new(vec![MockResponse {
            status: 404,
            headers: vec![],
            body: vec![],
        }]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();
        let dest_path = temp_dir.path().join("keycloak.zip");

        let result = downloader.download(
            "http://example.com/keycloak.zip",
            &dest_path,
            &DownloadOptions::default(),
        );

        match result.unwrap_err() {
            KeycloakError::HttpStatus { url, status } => {
                assert_eq!(status, 404);
                assert_eq!(url, "http://example.com/keycloak.zip");
            }
            other => panic!("Expected HttpStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_download_exceeding_size_limit() {
        let mock_client = MockHttpClient::new(vec![MockResponse {
            status: 200,
            headers: vec![
                ("Content-Length".to_string(), "2000000000".to_string()), // 2GB
            ],
            body: vec![],
        }]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();
        let dest_path = temp_dir.path().join("keycloak.zip");

        let result = downloader.download(
            "http://example.com/keycloak.zip",
            &dest_path,
            &DownloadOptions::default(),
        );

        match result.unwrap_err() {
            KeycloakError::ValidationError(msg) => assert!(msg.contains("exceeds maximum")),
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_download_body_larger_than_limit_without_length() {
        let mock_client = MockHttpClient::new(vec![MockResponse {
            status: 200,
            headers: vec![],
            body: vec![7u8; 64],
        }]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();
        let dest_path = temp_dir.path().join("keycloak.zip");

        let options = DownloadOptions {
            max_size: 16,
            ..Default::default()
        };
        let result = downloader.download("http://example.com/keycloak.zip", &dest_path, &options);

        assert!(matches!(result, Err(KeycloakError::ValidationError(_))));
        assert!(!dest_path.exists());
    }

    #[test]
    fn test_fetch_text() {
        let mock_client = MockHttpClient::new(vec![ok_response(b"abc  keycloak.zip\n")]);
        let downloader = HttpFileDownloader::with_client(Box::new(mock_client));

        let body = downloader
            .fetch_text("http://example.com/keycloak.zip.sha1")
            .unwrap();

        assert_eq!(body, "abc  keycloak.zip\n");
    }
}
