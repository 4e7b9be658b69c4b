//! Blocking duplex byte channel the engine runs over.

use std::io;

/// One inbound and one outbound byte stream. Both calls block until the
/// underlying channel completes; the protocol imposes no timeouts.
pub trait Transport {
    /// Read up to `buf.len()` bytes, returning the count read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write up to `buf.len()` bytes, returning the count written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Block until `buf` is filled.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "transport closed mid-read",
                    ))
                }
                n => filled += n,
            }
        }
        Ok(())
    }

    /// Block until all of `buf` is written.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let mut sent = 0;
        while sent < buf.len() {
            match self.write(&buf[sent..])? {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "transport closed mid-write",
                    ))
                }
                n => sent += n,
            }
        }
        Ok(())
    }
}

/// In-memory transport for engine tests: reads from a canned inbound
/// buffer, records every write as a separate operation.
#[cfg(test)]
pub struct MemTransport {
    inbound: io::Cursor<Vec<u8>>,
    pub writes: Vec<Vec<u8>>,
}

#[cfg(test)]
impl MemTransport {
    pub fn new(inbound: Vec<u8>) -> Self {
        Self {
            inbound: io::Cursor::new(inbound),
            writes: Vec::new(),
        }
    }

    /// Inbound bytes the session never consumed.
    pub fn unread(&self) -> usize {
        self.inbound.get_ref().len() - self.inbound.position() as usize
    }
}

#[cfg(test)]
impl Transport for MemTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.inbound, buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.push(buf.to_vec());
        Ok(buf.len())
    }
}
