//! Tech pack PDF generation.

pub mod fetch;
pub mod renderer;
pub mod service;

pub use fetch::{FetchedImage, HttpImageFetcher, ImageFetcher};
pub use renderer::{render_techpack, ImageSource};
pub use service::TechPackService;
