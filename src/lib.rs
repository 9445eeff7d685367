mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod startup;

pub use domain::{entities, path_rules, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{naming, storage};

use naming::signer::{FilenameSigner, ThreadRngSource};
use storage::local::LocalStorage;
use use_cases::{assets::{AssetHandler, AssetPolicy}, resolver::Resolver};

pub struct AppState {
    pub asset_handler: AppAssetHandler,
    pub resolver: Resolver<LocalStorage>,
    pub max_upload_bytes: usize,
}

pub type AppAssetHandler = AssetHandler<LocalStorage, ThreadRngSource>;

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Self {
        let storage = LocalStorage::from(config);
        let asset_handler = AssetHandler::new(
            storage.clone(),
            FilenameSigner::new(ThreadRngSource),
            AssetPolicy::from(config),
        );
        let resolver = Resolver::new(storage, config.placeholder.clone());

        AppState {
            asset_handler,
            resolver,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
