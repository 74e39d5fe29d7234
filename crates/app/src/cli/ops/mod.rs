pub mod daemon;
pub mod health;
pub mod init;
pub mod object;
pub mod version;

pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use object::Object;
pub use version::Version;
