mod identification_dto;

pub use identification_dto::*;
