//! Infrastructure layer implementations.

pub mod coininfo;
pub mod good_middleware;
pub mod http;
pub mod observability;

pub use coininfo::HttpCoinInfoClient;
pub use good_middleware::HttpGoodBackend;
pub use http::HttpClientConfig;
