pub mod asset;
pub mod holding;
pub mod metal;
pub mod overview;
pub mod portfolio;
pub mod price;
