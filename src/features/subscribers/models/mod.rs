mod subscriber;

pub use subscriber::SubscriberRecord;
