mod plantnet_client;

pub use plantnet_client::PlantNetClient;
