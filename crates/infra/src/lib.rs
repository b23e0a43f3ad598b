//! Infrastructure layer: durable client storage and external service adapters.

pub mod persisted;
pub mod services;
pub mod storage;

pub use persisted::{CustomLogo, PersistedState, TenantDetails, TenantRecord, keys};
pub use services::{
    InMemoryTranslator, LocaleCatalog, LocaleOption, LocaleUpdater, NoopLocaleUpdater,
    StaticLocaleCatalog, StaticTenantService, TenantService, Translator,
};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
