//! File-list manifest announced to the peer at session start.

/// Ordered list of package paths plus the announced payload length.
/// Built once at startup; the peer echoes entries back verbatim in its
/// range requests.
#[derive(Debug, Clone)]
pub struct Manifest {
    paths: Vec<String>,
    total_len: u32,
}

impl Manifest {
    /// Build from an ordered path list. Each entry is announced as
    /// `path + "\n"`, so `total_len` is the sum of `len(path) + 1`.
    pub fn build(paths: Vec<String>) -> Result<Self, ManifestError> {
        if paths.is_empty() {
            return Err(ManifestError::Empty);
        }
        let total_len = paths.iter().map(|p| p.len() as u32 + 1).sum();
        Ok(Self { paths, total_len })
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Announced payload length in bytes.
    pub fn total_len(&self) -> u32 {
        self.total_len
    }

    /// Concatenated newline-terminated entries, in announce order.
    pub fn payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_len as usize);
        for path in &self.paths {
            out.extend_from_slice(path.as_bytes());
            out.push(b'\n');
        }
        out
    }
}

/// Error building the manifest. The announcement protocol requires at
/// least one file.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("no files to announce")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_len_counts_newlines() {
        let m = Manifest::build(vec!["a.nsp".into(), "sub/b.nsp".into()]).unwrap();
        assert_eq!(m.total_len(), (5 + 1) + (9 + 1));
    }

    #[test]
    fn payload_preserves_order() {
        let m = Manifest::build(vec!["a.nsp".into(), "sub/b.nsp".into()]).unwrap();
        assert_eq!(m.payload(), b"a.nsp\nsub/b.nsp\n");
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(
            Manifest::build(Vec::new()),
            Err(ManifestError::Empty)
        ));
    }

    #[test]
    fn single_entry() {
        let m = Manifest::build(vec!["game.nsp".into()]).unwrap();
        assert_eq!(m.total_len(), 9);
        assert_eq!(m.paths().len(), 1);
    }
}
