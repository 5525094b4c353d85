pub mod asset;
pub mod scene;
