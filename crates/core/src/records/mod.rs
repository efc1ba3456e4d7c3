//! Project records and the record-store query contract.

mod in_memory_store;
mod records_model;
mod records_traits;

pub use in_memory_store::InMemoryRecordStore;
pub use records_model::*;
pub use records_traits::RecordStoreTrait;
