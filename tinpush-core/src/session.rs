//! Command dispatch loop: announce the manifest, then poll the peer
//! until it sends an exit command.

use std::io;

use tracing::{debug, info, warn};

use crate::manifest::Manifest;
use crate::protocol::{Command, COMMAND_FRAME_LEN};
use crate::stream::{self, StreamError};
use crate::transport::Transport;
use crate::wire;

/// Send the file-list announcement. Done once, before the first command.
pub fn announce<T: Transport>(transport: &mut T, manifest: &Manifest) -> Result<(), SessionError> {
    info!(
        files = manifest.paths().len(),
        bytes = manifest.total_len(),
        "announcing file list"
    );
    transport
        .write_all(&wire::encode_announcement(manifest))
        .map_err(SessionError::Transport)
}

/// Poll for command frames until the peer terminates the session.
///
/// One command is outstanding at a time: a FileRange command is served
/// to completion before the next frame is read. A frame with an
/// unexpected magic tag is dropped whole (the protocol has no
/// self-delimiting recovery, so no byte-level realignment is attempted);
/// a valid frame with an unknown command id is ignored.
pub fn run_session<T: Transport>(transport: &mut T) -> Result<(), SessionError> {
    let mut frame = [0u8; COMMAND_FRAME_LEN];
    loop {
        transport
            .read_exact(&mut frame)
            .map_err(SessionError::Transport)?;
        let decoded = match wire::decode_command_frame(&frame) {
            Some(decoded) => decoded,
            None => {
                warn!("unexpected magic, dropping one command-frame window");
                continue;
            }
        };
        debug!(
            frame_type = decoded.frame_type,
            id = decoded.command.id(),
            payload_size = decoded.payload_size,
            "command frame"
        );
        match decoded.command {
            Command::Exit => {
                info!("peer finished, exiting session");
                return Ok(());
            }
            Command::FileRange => stream::serve_range(transport)?,
            Command::Unrecognized(id) => {
                warn!(id, "unrecognized command id, ignoring");
            }
        }
    }
}

/// Fatal session conditions; the only non-fatal protocol condition
/// (magic mismatch) is handled inside the loop by discarding the frame.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("transport i/o failed: {0}")]
    Transport(#[source] io::Error),
    #[error(transparent)]
    Stream(#[from] StreamError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::COMMAND_MAGIC;
    use crate::transport::MemTransport;
    use std::io::Write;

    fn command_frame(id: u32) -> [u8; COMMAND_FRAME_LEN] {
        let mut frame = [0u8; COMMAND_FRAME_LEN];
        frame[0..4].copy_from_slice(COMMAND_MAGIC);
        frame[8..12].copy_from_slice(&id.to_le_bytes());
        frame
    }

    fn range_request(name: &str, offset: u64, size: u64) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(name.len() as u64).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out
    }

    #[test]
    fn exit_terminates_without_further_reads() {
        let mut inbound = command_frame(0).to_vec();
        inbound.extend_from_slice(&[0xEE; 64]); // never consumed
        let mut t = MemTransport::new(inbound);
        run_session(&mut t).unwrap();
        assert_eq!(t.unread(), 64);
        assert!(t.writes.is_empty());
    }

    #[test]
    fn bad_magic_discards_one_window_and_continues() {
        let mut inbound = vec![0xFFu8; COMMAND_FRAME_LEN];
        inbound.extend_from_slice(&command_frame(0));
        let mut t = MemTransport::new(inbound);
        run_session(&mut t).unwrap();
        assert_eq!(t.unread(), 0);
        assert!(t.writes.is_empty());
    }

    #[test]
    fn unrecognized_id_is_ignored() {
        let mut inbound = command_frame(9).to_vec();
        inbound.extend_from_slice(&command_frame(0));
        let mut t = MemTransport::new(inbound);
        run_session(&mut t).unwrap();
        assert!(t.writes.is_empty());
    }

    #[test]
    fn file_range_serves_then_resumes_polling() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"package-bytes").unwrap();
        f.flush().unwrap();
        let name = f.path().to_str().unwrap();

        let mut inbound = command_frame(1).to_vec();
        inbound.extend_from_slice(&range_request(name, 0, 7));
        inbound.extend_from_slice(&command_frame(0));
        let mut t = MemTransport::new(inbound);
        run_session(&mut t).unwrap();
        assert_eq!(t.writes.len(), 2);
        assert_eq!(t.writes[0].len(), COMMAND_FRAME_LEN);
        assert_eq!(t.writes[1], b"package");
        assert_eq!(t.unread(), 0);
    }

    #[test]
    fn truncated_stream_is_a_transport_error() {
        let mut t = MemTransport::new(vec![0u8; 10]);
        let err = run_session(&mut t).unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
    }

    #[test]
    fn announce_writes_one_frame() {
        let manifest = Manifest::build(vec!["a.nsp".into()]).unwrap();
        let mut t = MemTransport::new(Vec::new());
        announce(&mut t, &manifest).unwrap();
        assert_eq!(t.writes.len(), 1);
        assert_eq!(&t.writes[0][0..4], b"TUL0");
        assert_eq!(t.writes[0].len(), 16 + 6);
    }
}
