// Emendo library exports

pub mod buffer;
pub mod capability;
pub mod config;
pub mod edit;
pub mod fallback;
pub mod highlight;
pub mod instructions;
pub mod screen;
pub mod width;

pub use buffer::Buffer;
pub use capability::Capability;
pub use config::Config;
pub use edit::edit_code;
pub use fallback::edit_basic;
pub use screen::edit_rich;
