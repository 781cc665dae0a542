mod image_service;

pub use image_service::{ImageEdit, ImageService};
