//! Wire constants: magic tags, command identifiers, frame layout sizes.

/// Magic tag opening the file-list announcement ("Tinfoil USB List 0").
pub const LIST_MAGIC: &[u8; 4] = b"TUL0";

/// Magic tag opening every command and response frame ("Tinfoil USB Command 0").
pub const COMMAND_MAGIC: &[u8; 4] = b"TUC0";

/// Announcement header: magic + LE u32 payload length + 8 bytes padding.
pub const LIST_HEADER_LEN: usize = 16;

/// Command and response frames are both exactly 32 bytes.
pub const COMMAND_FRAME_LEN: usize = 32;

/// Numeric head of a range request: LE u64 size, offset, name length.
pub const RANGE_HEADER_LEN: usize = 24;

/// Frame type byte marking a response frame.
pub const RESPONSE_TYPE: u8 = 1;

/// Most bytes written to the transport in one streaming operation.
pub const CHUNK_LEN: usize = 8 * 1024 * 1024; // 8 MiB

const CMD_ID_EXIT: u32 = 0;
const CMD_ID_FILE_RANGE: u32 = 1;

/// Command identifier carried in a command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Session is over; terminate cleanly.
    Exit,
    /// A file-range request sub-message follows.
    FileRange,
    /// Structurally valid frame with an id we do not know; ignored.
    Unrecognized(u32),
}

impl Command {
    pub fn from_u32(id: u32) -> Self {
        match id {
            CMD_ID_EXIT => Self::Exit,
            CMD_ID_FILE_RANGE => Self::FileRange,
            other => Self::Unrecognized(other),
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Self::Exit => CMD_ID_EXIT,
            Self::FileRange => CMD_ID_FILE_RANGE,
            Self::Unrecognized(other) => other,
        }
    }
}
