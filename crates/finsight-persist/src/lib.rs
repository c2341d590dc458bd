pub mod builder;
pub mod dbs;
pub mod error;
pub mod memory;
pub mod stores;

pub use builder::StoresBuilder;
pub use error::{PersistError, Result};
pub use memory::MemoryStore;
pub use stores::{
    AuthTokenStore, ClientStore, MessageStore, PreferenceStore, ReportStore, SessionStore,
    Stores, TranscriptStore,
};

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoStore;
