//! Domain records persisted by the store and returned over HTTP.

mod entities;
mod ids;

pub use entities::{Activity, Board, Group, Item, NewActivity, Workspace};
pub use ids::{BoardId, GroupId, ItemId, UserId, WorkspaceId};
