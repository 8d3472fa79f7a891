//! HTTP gateway to the care backend

mod gateway;

pub use gateway::{HttpGateway, HttpGatewayBuilder, RequestOptions};
