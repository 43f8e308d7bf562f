pub mod id;
pub mod memory;
pub mod rest;
pub mod schedule;
pub mod state;
pub mod store;

pub use id::DocumentId;
pub use memory::InMemoryStore;
pub use rest::RestDocumentStore;
pub use schedule::ScheduleRepository;
pub use state::{connect, AppState};
pub use store::{Document, DocumentStore, StoreError, StoreResult, ID_FIELD};
