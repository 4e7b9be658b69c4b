//! Range streamer: serve one file byte-range request from disk.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use tracing::debug;

use crate::protocol::{Command, CHUNK_LEN, RANGE_HEADER_LEN};
use crate::transport::Transport;
use crate::wire;

/// A fully decoded file-range request.
#[derive(Debug, Clone)]
pub struct RangeRequest {
    pub name: String,
    pub offset: u64,
    pub size: u64,
}

/// Read the range-request sub-message: 24-byte numeric header first,
/// then exactly `name_len` bytes of file name.
pub fn read_range_request<T: Transport>(transport: &mut T) -> Result<RangeRequest, StreamError> {
    let mut header = [0u8; RANGE_HEADER_LEN];
    transport
        .read_exact(&mut header)
        .map_err(StreamError::Transport)?;
    let header = wire::decode_range_header(&header);
    let mut name = vec![0u8; header.name_len as usize];
    transport
        .read_exact(&mut name)
        .map_err(StreamError::Transport)?;
    let name = wire::decode_range_name(&name)?;
    Ok(RangeRequest {
        name,
        offset: header.offset,
        size: header.size,
    })
}

/// Serve one FileRange command: read the request, validate it against
/// the file on disk, send the response header, then stream exactly
/// `size` bytes in chunks of at most [`CHUNK_LEN`].
pub fn serve_range<T: Transport>(transport: &mut T) -> Result<(), StreamError> {
    let req = read_range_request(transport)?;
    debug!(
        name = %req.name,
        offset = req.offset,
        size = req.size,
        "serving file range"
    );

    let mut file = File::open(&req.name).map_err(|source| StreamError::FileOpen {
        path: req.name.clone(),
        source,
    })?;
    let file_len = file
        .metadata()
        .map_err(|source| StreamError::FileOpen {
            path: req.name.clone(),
            source,
        })?
        .len();

    // The requested window must lie entirely inside the file.
    let in_bounds = req
        .offset
        .checked_add(req.size)
        .is_some_and(|end| end <= file_len);
    if !in_bounds {
        return Err(StreamError::RangeBounds {
            path: req.name,
            offset: req.offset,
            size: req.size,
            file_len,
        });
    }

    transport
        .write_all(&wire::encode_response_header(Command::FileRange, req.size))
        .map_err(StreamError::Transport)?;

    file.seek(SeekFrom::Start(req.offset))
        .map_err(StreamError::RangeTransfer)?;
    let mut buf = vec![0u8; req.size.min(CHUNK_LEN as u64) as usize];
    let mut remaining = req.size;
    while remaining > 0 {
        let n = remaining.min(CHUNK_LEN as u64) as usize;
        file.read_exact(&mut buf[..n])
            .map_err(StreamError::RangeTransfer)?;
        transport
            .write_all(&buf[..n])
            .map_err(StreamError::RangeTransfer)?;
        remaining -= n as u64;
    }
    Ok(())
}

/// Fatal conditions while serving a range. All of these terminate the
/// session; only the caller decides how to report them.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("transport i/o failed: {0}")]
    Transport(#[source] io::Error),
    #[error(transparent)]
    Request(#[from] wire::RequestDecodeError),
    #[error("failed to open {path}: {source}")]
    FileOpen { path: String, source: io::Error },
    #[error("range {offset}+{size} exceeds {path} ({file_len} bytes)")]
    RangeBounds {
        path: String,
        offset: u64,
        size: u64,
        file_len: u64,
    },
    #[error("range transfer failed: {0}")]
    RangeTransfer(#[source] io::Error),
}
