//! Scoped temp file handing message content to the memory service.

use std::{io::Write, path::Path};

use tempfile::NamedTempFile;

/// Ephemeral on-disk container for one message's text.
///
/// The memory service ingests content by resource path, so the processor
/// spills the message into a uniquely named temp file for the duration of one
/// `memorize` call. The file is deleted on drop, which covers every exit
/// path including early returns on gateway failure.
#[derive(Debug)]
pub struct WorkingArtifact {
    file: NamedTempFile,
}

impl WorkingArtifact {
    /// Create the artifact and write `content` into it.
    pub fn write(content: &str) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(&format!("membot_input_{}_", uuid::Uuid::new_v4()))
            .suffix(".txt")
            .tempfile()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
