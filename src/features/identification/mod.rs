//! Plant identification proxy in front of PlantNet

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use clients::PlantNetClient;
pub use services::IdentificationService;
