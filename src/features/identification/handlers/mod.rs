mod identification_handler;

pub use identification_handler::*;
