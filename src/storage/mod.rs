// storage/mod.rs
// SQLite persistence for categories, agencies and sessions

mod agencies;
mod categories;
pub mod migrations;
pub mod models;
pub mod pool;
mod session;
mod store;

#[cfg(test)]
pub mod test_helpers;

pub use migrations::run_migrations;
pub use models::{
    Agency, Category, NewAgency, NewCategory, PendingDetail, SessionState, SessionStatus,
};
pub use pool::init_db_pool_with_path;
pub use store::Store;
