pub mod bcra;
pub mod gateway_client;
pub mod util;

pub use bcra::BcraProvider;
pub use gateway_client::GatewayClient;
