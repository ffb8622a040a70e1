pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infrastructure;

use application::cart_store::CartStore;
use application::session::SessionStore;
use domain::errors::{DomainError, StorageError};
use infrastructure::file_storage::FileStorage;
use infrastructure::http::ApiClient;

pub use config::Config;

/// Open the on-disk storage directory named by `config`.
pub fn open_storage(config: &Config) -> Result<FileStorage, StorageError> {
    FileStorage::open(&config.data_dir)
}

/// Restore the persisted cart and session from the storage directory.
pub fn restore_state(
    config: &Config,
) -> Result<(CartStore<FileStorage>, SessionStore<FileStorage>), StorageError> {
    let storage = open_storage(config)?;
    Ok((
        CartStore::restore(storage.clone()),
        SessionStore::restore(storage),
    ))
}

/// Build the REST client shared by the service adapters, authenticated as the
/// current session when there is one.
pub fn api_client<S>(
    config: &Config,
    session: &SessionStore<S>,
) -> Result<ApiClient, DomainError>
where
    S: domain::ports::KeyValueStorage,
{
    let client = ApiClient::new(&config.api_url, config.http_timeout)?;
    Ok(match session.token() {
        Some(token) => client.with_token(token),
        None => client,
    })
}
