pub mod api_key;
pub mod app_state;
pub mod error;
pub mod extjson;
pub mod requests;
pub mod responses;
pub mod tls;

pub use api_key::ApiKey;
pub use app_state::AppState;
pub use error::AppError;
