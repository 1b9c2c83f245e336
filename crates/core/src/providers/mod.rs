pub mod traits;

// Account service implementations
pub mod http;
