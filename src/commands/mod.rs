pub mod config;
mod debug;
mod delete;
mod list;
mod upload;

pub use debug::debug;
pub use delete::delete;
pub use list::list;
pub use upload::upload;
