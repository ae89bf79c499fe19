fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use portal_protocol::constants::{Method, SCHEDULER_SERVICE};
    use portal_protocol::envelope::{Request, Response};
    use portal_protocol::messages::{
        DownloadBlockRequest, DownloadBlockResponse, UploadBlockRequest,
    };
    use portal_protocol::types::{FileMeta, FileRecord, FileState};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (key-order independent). Returns the parsed value.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  Rust: {reserialized}"
        );
        parsed
    }

    // --- Envelopes ---

    #[test]
    fn fixture_request_writefile() {
        let req: Request = roundtrip_test("request_writefile.json");
        assert_eq!(req.service, SCHEDULER_SERVICE);
        assert_eq!(req.method, Method::WriteFile);

        // The body carries exactly the upload block fixture.
        let body: UploadBlockRequest = req.parse_body().unwrap();
        let standalone: UploadBlockRequest =
            serde_json::from_value(load_fixture("upload_block_request.json")).unwrap();
        assert_eq!(body, standalone);
    }

    #[test]
    fn fixture_request_readfile() {
        let req: Request = roundtrip_test("request_readfile.json");
        assert_eq!(req.method, Method::ReadFile);
        let body: DownloadBlockRequest = req.parse_body().unwrap();
        assert_eq!(body.block_num, 1);
    }

    #[test]
    fn fixture_response_ok() {
        let resp: Response = roundtrip_test("response_ok.json");
        assert!(resp.is_ok());
        let block: DownloadBlockResponse = resp.parse_data().unwrap();
        assert_eq!(block.data, b"hello block");
    }

    #[test]
    fn fixture_response_error() {
        let resp: Response = roundtrip_test("response_error.json");
        assert!(!resp.is_ok());
        assert_eq!(resp.message, "no space left on scheduler");
        assert!(resp.data.is_empty());
    }

    // --- Block payloads ---

    #[test]
    fn fixture_upload_block_request() {
        let req: UploadBlockRequest = roundtrip_test("upload_block_request.json");
        assert_eq!(req.block_num, 2);
        assert_eq!(req.blocks, 2);
        assert_eq!(req.data, (0u8..10).collect::<Vec<_>>());
    }

    #[test]
    fn fixture_download_block_request() {
        roundtrip_test::<DownloadBlockRequest>("download_block_request.json");
    }

    #[test]
    fn fixture_download_block_response() {
        let resp: DownloadBlockResponse = roundtrip_test("download_block_response.json");
        assert!(resp.block_num < resp.blocks);
    }

    // --- Chain records ---

    #[test]
    fn fixture_file_record() {
        let rec: FileRecord = roundtrip_test("file_record.json");
        assert_eq!(rec.state, FileState::Active);
        assert!(!rec.is_public);
    }

    #[test]
    fn fixture_file_meta() {
        let meta: FileMeta = roundtrip_test("file_meta.json");
        assert!(meta.is_public);
        assert_eq!(meta.size_kb, 2048);
    }
}
