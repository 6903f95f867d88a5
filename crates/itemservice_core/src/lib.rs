//! Item catalogue core: model, repository backends and use-case service.
//! Storage strategies are interchangeable behind `ItemRepository`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId, ItemSearchCond, ItemUpdateDto, ITEM_NAME_MAX_LEN};
pub use repo::filter::{BindStyle, FilterSql, ItemFilter};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult};
pub use repo::memory_repo::MemoryItemRepository;
pub use repo::session_repo::SqliteSessionItemRepository;
pub use repo::sqlite_repo::SqliteItemRepository;
pub use service::item_service::ItemService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
