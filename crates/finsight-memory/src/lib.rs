mod index;
mod manager;
mod splitter;

pub use index::{ChunkMetadata, ExchangeIndex, KeywordIndex, SearchHit};
pub use manager::{ConversationMemory, RecordOutcome, DEFAULT_HISTORY_LIMIT, NO_HISTORY_SUMMARY};
pub use splitter::TextSplitter;
