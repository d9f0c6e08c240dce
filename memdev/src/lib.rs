pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod error_mapping;
pub mod idgen;
pub mod io;
pub mod session;
pub mod table;
pub mod transport;
pub mod unit;

pub use cancel::CancelToken;
pub use config::{Config, ConfigError};
pub use engine::{ControlCommand, Whence};
pub use error::UnitError;
pub use idgen::{IdGen, UnitId};
pub use io::Buffer;
pub use session::Session;
pub use table::UnitTable;
pub use transport::{FdTable, Transport};
pub use unit::{StorageUnit, UnitGuard};
