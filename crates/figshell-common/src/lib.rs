pub mod commands;
pub mod errors;
pub mod types;

pub use commands::{CommandSender, Coordinator, ShellCommand};
pub use errors::{ConfigError, ShellError, SurfaceError};
pub use types::{Rect, TabId, WindowId};

pub type Result<T> = std::result::Result<T, ShellError>;
