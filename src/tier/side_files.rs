//! Lifecycle of per-segment annotation side files.
//!
//! Each segment may own a careful-speech and an oral-translation recording
//! whose names are derived from the segment boundaries. Rename and delete are
//! best-effort: the tier's structural state is authoritative and a locked or
//! missing file must never block a boundary edit, so failures are logged and
//! collected rather than propagated.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::SideFileNaming;

use super::Segment;

/// Called with a side file's path just before it is renamed or deleted,
/// giving the host application a chance to back the file up for undo.
pub trait BackupHook {
    fn backup(&self, path: &Path);
}

/// Default hook that backs nothing up.
#[derive(Debug, Default)]
pub struct NoopBackup;

impl BackupHook for NoopBackup {
    fn backup(&self, _path: &Path) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideFileRole {
    CarefulSpeech,
    OralTranslation,
}

impl SideFileRole {
    const ALL: [SideFileRole; 2] = [SideFileRole::CarefulSpeech, SideFileRole::OralTranslation];
}

/// Computes side-file paths for one media file and performs the best-effort
/// rename/delete operations.
#[derive(Debug, Clone)]
pub struct SideFileManager {
    folder: PathBuf,
    naming: SideFileNaming,
}

impl SideFileManager {
    pub fn new(media_file: &Path, naming: SideFileNaming) -> Self {
        let folder = PathBuf::from(format!(
            "{}{}",
            media_file.display(),
            naming.folder_suffix
        ));
        Self { folder, naming }
    }

    /// Folder holding all side files for the media file.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn file_name(&self, start: f32, end: f32, role: SideFileRole) -> String {
        let suffix = match role {
            SideFileRole::CarefulSpeech => &self.naming.careful_suffix,
            SideFileRole::OralTranslation => &self.naming.translation_suffix,
        };
        format!("{start}_to_{end}{suffix}")
    }

    pub fn path_for(&self, segment: &Segment, role: SideFileRole) -> PathBuf {
        self.folder
            .join(self.file_name(segment.start, segment.end, role))
    }

    /// Renames both of `old`'s side files to the names derived from the new
    /// boundaries. Returns the paths that could not be renamed.
    pub fn rename(
        &self,
        old: &Segment,
        new_start: f32,
        new_end: f32,
        backup: &dyn BackupHook,
    ) -> Vec<PathBuf> {
        let mut failed = Vec::new();

        for role in SideFileRole::ALL {
            let old_path = self.path_for(old, role);
            if !old_path.exists() {
                continue;
            }

            backup.backup(&old_path);

            let new_path = self.folder.join(self.file_name(new_start, new_end, role));
            if let Err(e) = fs::rename(&old_path, &new_path) {
                warn!("Failed to rename {}: {e}", old_path.display());
                failed.push(old_path);
            }
        }

        failed
    }

    /// Deletes both of `segment`'s side files. Returns the paths that could
    /// not be deleted.
    pub fn delete(&self, segment: &Segment, backup: &dyn BackupHook) -> Vec<PathBuf> {
        let mut failed = Vec::new();

        for role in SideFileRole::ALL {
            let path = self.path_for(segment, role);
            if !path.exists() {
                continue;
            }

            backup.backup(&path);

            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to delete {}: {e}", path.display());
                failed.push(path);
            }
        }

        failed
    }
}
