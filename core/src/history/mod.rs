pub mod store;
pub mod window;

pub use store::HistoryStore;
pub use window::ClassHistory;
