pub mod host;
pub mod overlay;
pub mod preprocess;
pub mod region;
pub mod state;
