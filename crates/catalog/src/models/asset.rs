use crate::asset::Asset;
use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use time::UtcDateTime;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AssetRow {
    pub(crate) id: String,
    pub(crate) path: String,
    pub(crate) encoded_path: String,
    pub(crate) url: String,
    pub(crate) download_url: Option<String>,
    pub(crate) expected_hash: Option<String>,
    pub(crate) total_size: Option<i64>,
    pub(crate) recorded_at: i64,
}
impl AssetRow {
    /// Build a row for an asset being recorded at `recorded_at`.
    pub(crate) fn new(asset: &Asset, recorded_at: UtcDateTime) -> Result<Self, Error> {
        Ok(Self {
            id: asset.id.clone(),
            path: asset.path.clone(),
            encoded_path: asset.encoded_path.clone(),
            url: asset.url.clone(),
            download_url: asset.download_url.clone(),
            expected_hash: asset.expected_hash.clone(),
            total_size: asset
                .total_size
                .map(i64::try_from)
                .transpose()
                .or_raise(|| ErrorKind::InvalidData("total size"))?,
            recorded_at: recorded_at.unix_timestamp(),
        })
    }
}
impl TryFrom<AssetRow> for Asset {
    type Error = Error;
    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            url: row.url,
            download_url: row.download_url,
            expected_hash: row.expected_hash,
            total_size: row
                .total_size
                .map(u64::try_from)
                .transpose()
                .or_raise(|| ErrorKind::InvalidData("total size"))?,
            encoded_path: row.encoded_path,
            path: row.path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(total_size: Option<u64>) -> Asset {
        Asset {
            id: "asset-1".to_string(),
            url: "https://cdn.test/example.txt".to_string(),
            download_url: Some("https://cdn.test/example.txt?dl=1".to_string()),
            expected_hash: Some("blake3-abc".to_string()),
            total_size,
            encoded_path: "assets%2Ffolder1%2Fexample.txt".to_string(),
            path: "folder1/example.txt".to_string(),
        }
    }

    #[test]
    fn test_model_to_row() {
        let now = UtcDateTime::now();
        let row = AssetRow::new(&asset(Some(13)), now).unwrap();
        assert_eq!(row.total_size, Some(13));
        assert_eq!(row.recorded_at, now.unix_timestamp());
        assert_eq!(row.encoded_path, "assets%2Ffolder1%2Fexample.txt");
    }

    #[test]
    fn test_model_to_row_rejects_oversized() {
        let err = AssetRow::new(&asset(Some(u64::MAX)), UtcDateTime::now()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData("total size")));
    }

    #[test]
    fn test_row_to_model() {
        let row = AssetRow::new(&asset(None), UtcDateTime::now()).unwrap();
        assert_eq!(Asset::try_from(row).unwrap(), asset(None));
    }

    #[test]
    fn test_row_to_model_rejects_negative_size() {
        let mut row = AssetRow::new(&asset(Some(1)), UtcDateTime::now()).unwrap();
        row.total_size = Some(-1);
        assert!(Asset::try_from(row).is_err());
    }
}
