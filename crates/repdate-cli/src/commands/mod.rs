pub mod dates;
pub mod delete;
pub mod expand;
pub mod group;
pub mod list;
pub mod next;
pub mod save;
pub mod show;
