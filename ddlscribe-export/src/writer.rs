//! Export writer: one `.sql` file per object.
//!
//! Directories are created lazily, per object, so an empty category leaves
//! no directory behind. Writes are whole-buffer UTF-8 and overwrite
//! unconditionally; there is no atomic replace and no backup.

use std::path::{Path, PathBuf};

use ddlscribe_core::{DdlScribeError, ObjectKind, Result, SqlObject};
use tokio_util::sync::CancellationToken;

/// Writes category lists under `<output>/<server>/<database>/`.
pub struct DdlWriter {
    root: PathBuf,
    include_header: bool,
}

impl DdlWriter {
    /// Creates a writer rooted at `<output>/<server>/<database>`.
    #[must_use]
    pub fn new(output: &Path, server: &str, database: &str, include_header: bool) -> Self {
        Self {
            root: output.join(server).join(database),
            include_header,
        }
    }

    /// Root directory files are written under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes one category's objects and returns the number written.
    ///
    /// The cancellation token is checked before each file; a write is
    /// all-or-nothing per file, so cancellation never leaves a partial
    /// file behind.
    ///
    /// # Errors
    /// Fails with an I/O error on directory or file failure (files already
    /// written in earlier categories remain on disk) or with a
    /// cancellation error when the token has fired.
    pub async fn write_category(
        &self,
        kind: ObjectKind,
        objects: &[SqlObject],
        cancel: &CancellationToken,
    ) -> Result<usize> {
        for object in objects {
            if cancel.is_cancelled() {
                return Err(DdlScribeError::cancelled(format!(
                    "while writing {}",
                    kind.label().to_lowercase()
                )));
            }

            let directory = self.root.join(kind.directory());
            tokio::fs::create_dir_all(&directory).await.map_err(|e| {
                DdlScribeError::io(
                    format!("failed to create directory {}", directory.display()),
                    e,
                )
            })?;

            let path = directory.join(object.file_name());
            tokio::fs::write(&path, object.sql_definition(self.include_header))
                .await
                .map_err(|e| {
                    DdlScribeError::io(format!("failed to write {}", path.display()), e)
                })?;

            tracing::debug!(file = %path.display(), "wrote object definition");
        }
        Ok(objects.len())
    }
}
