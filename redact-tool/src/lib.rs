mod app;
mod auth;
mod config;
mod jobs;
mod storage;
mod token_store;

pub use app::run_native;
pub use auth::{token_from_response, AuthClient, AuthError};
pub use config::Config;
pub use jobs::UiFuture;
pub use storage::{FileStorage, ImageData, ImageId, InMemoryStorage, Storage};
pub use token_store::{FileTokenStore, InMemoryTokenStore, TokenStore};
