// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod app;
pub mod config;
pub mod cors;
pub mod http_logging;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{load_config, ConfigError, DaemonConfig};
pub use model::{
    Activity, Board, BoardId, Group, GroupId, Item, ItemId, UserId, Workspace, WorkspaceId,
};
pub use ordering::{append_position, OrderingError, ReorderBatch, ReorderKind, Scope};
pub use server::{router, ApiError, AppState};
pub use store::{MemoryStore, SqliteStore, Store, StoreError};
