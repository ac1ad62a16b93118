mod asset;

pub(crate) use self::asset::AssetRow;
