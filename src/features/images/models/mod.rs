mod image;
mod schema;

pub use image::{ImageRecord, ModerationState, PublicationCategory};
pub use schema::ImageSchema;
