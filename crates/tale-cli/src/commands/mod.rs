pub mod list;
pub mod play;
