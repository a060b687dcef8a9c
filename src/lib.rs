pub mod collect;
pub mod config;
pub mod error;
pub mod match_data;
pub mod preprocess;
pub mod riot_api;

pub use config::ApiConfig;
pub use error::{FlattenError, RiotApiError};
pub use riot_api::RiotClient;
