pub mod http_address_client;
pub mod wire;

pub use http_address_client::HttpAddressClient;
