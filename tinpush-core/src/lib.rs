//! Tinfoil USB install protocol, client side.
//! Engine only: all device I/O goes through the blocking `Transport` trait.

pub mod manifest;
pub mod protocol;
pub mod session;
pub mod stream;
pub mod transport;
pub mod wire;

pub use manifest::{Manifest, ManifestError};
pub use protocol::{Command, CHUNK_LEN, COMMAND_FRAME_LEN};
pub use session::{announce, run_session, SessionError};
pub use transport::Transport;
