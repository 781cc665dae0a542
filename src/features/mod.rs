pub mod auth;
pub mod identification;
pub mod images;
pub mod subscribers;
pub mod system;
