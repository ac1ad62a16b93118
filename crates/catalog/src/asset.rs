use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Characters left as-is when encoding an asset path: alphanumerics plus
/// `-_.!~*'()`, the same set `encodeURIComponent` leaves alone, so encoded
/// paths match what browser-side code produces.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a full asset path (`folder/relative/path`) as a single
/// component; slashes are encoded too.
///
/// ```
/// use stash_catalog::encode_path;
/// assert_eq!(encode_path("assets/folder1/example.txt"), "assets%2Ffolder1%2Fexample.txt");
/// ```
pub fn encode_path(asset_path: &str) -> String {
    utf8_percent_encode(asset_path, COMPONENT).to_string()
}

/// Metadata recorded for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Backend-supplied object key, or a generated identifier
    pub id: String,
    /// Canonical url of the stored file
    pub url: String,
    pub download_url: Option<String>,
    /// Integrity token reported by the storage backend
    pub expected_hash: Option<String>,
    /// Size of the uploaded data in bytes
    pub total_size: Option<u64>,
    /// Percent-encoded full asset path (see [`encode_path`])
    pub encoded_path: String,
    /// Path relative to the folder the asset was uploaded into
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("assets/folder1/example.txt", "assets%2Ffolder1%2Fexample.txt")]
    #[case("assets/my file.txt", "assets%2Fmy%20file.txt")]
    #[case("a/b-c_d.e!f~g*h'i(j)k", "a%2Fb-c_d.e!f~g*h'i(j)k")]
    #[case("q?x=1&y=#z", "q%3Fx%3D1%26y%3D%23z")]
    #[case("résumé.pdf", "r%C3%A9sum%C3%A9.pdf")]
    #[case("", "")]
    fn test_encode_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(encode_path(input), expected);
    }

    #[test]
    fn test_serialize() {
        let asset = Asset {
            id: "asset-1".to_string(),
            url: "https://cdn.test/a.txt".to_string(),
            download_url: None,
            expected_hash: Some("blake3-00".to_string()),
            total_size: Some(13),
            encoded_path: encode_path("assets/a.txt"),
            path: "a.txt".to_string(),
        };
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["encoded_path"], "assets%2Fa.txt");
        assert_eq!(json["total_size"], 13);
        assert!(json["download_url"].is_null());
    }
}
