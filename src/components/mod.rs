pub mod detail_overlay;
pub mod upload;
