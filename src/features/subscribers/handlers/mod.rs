mod subscriber_handler;

pub use subscriber_handler::*;
