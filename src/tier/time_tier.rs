//! The time tier: an ordered, non-overlapping partition of a recording's
//! timeline, plus the boundary-edit operations interactive editors need.
//!
//! Segments are owned by the tier and addressed by index or boundary lookup.
//! Every mutating operation either keeps the sequence time-ordered and
//! adjacent or rejects with a [`BoundaryModification`] code; side-file
//! renames and deletes ride along on each structural change.

use std::path::{Path, PathBuf};

use crate::config::SideFileNaming;

use super::side_files::{BackupHook, NoopBackup, SideFileManager, SideFileRole};
use super::{BoundaryModification, Segment, MIN_SEGMENT_SECONDS};

pub struct TimeTier {
    id: String,
    media_file: PathBuf,
    segments: Vec<Segment>,
    side_files: SideFileManager,
    backup: Box<dyn BackupHook>,
    side_file_failures: Vec<PathBuf>,
}

impl TimeTier {
    pub fn new(media_file: &Path) -> Self {
        Self::with_id("Original", media_file)
    }

    pub fn with_id(id: &str, media_file: &Path) -> Self {
        Self {
            id: id.to_string(),
            media_file: media_file.to_path_buf(),
            segments: Vec::new(),
            side_files: SideFileManager::new(media_file, SideFileNaming::default()),
            backup: Box::new(NoopBackup),
            side_file_failures: Vec::new(),
        }
    }

    pub fn with_naming(mut self, naming: SideFileNaming) -> Self {
        self.side_files = SideFileManager::new(&self.media_file, naming);
        self
    }

    /// Installs the hook invoked before each destructive side-file
    /// operation.
    pub fn with_backup_hook(mut self, hook: Box<dyn BackupHook>) -> Self {
        self.backup = hook;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn media_file(&self) -> &Path {
        &self.media_file
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Side-file paths that could not be renamed or deleted so far. The
    /// edits themselves still succeeded; this exists so hosts can surface
    /// the stragglers instead of losing them silently.
    pub fn side_file_failures(&self) -> &[PathBuf] {
        &self.side_file_failures
    }

    pub fn clear_side_file_failures(&mut self) {
        self.side_file_failures.clear();
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn index_of_segment(&self, segment: &Segment) -> Option<usize> {
        self.segments.iter().position(|s| s == segment)
    }

    pub fn segment_having_end_boundary(&self, end_boundary: f32) -> Option<usize> {
        self.segments.iter().position(|s| s.end == end_boundary)
    }

    pub fn segment_enclosing_time(&self, time: f32) -> Option<usize> {
        self.segments.iter().position(|s| s.encloses(time))
    }

    // ------------------------------------------------------------------
    // Adding and removing segments
    // ------------------------------------------------------------------

    /// Inserts a segment at the end of the order. Callers are responsible
    /// for appending in time order.
    pub fn add_segment(&mut self, start: f32, end: f32) -> &Segment {
        self.segments.push(Segment::new(start, end));
        self.segments.last().unwrap()
    }

    /// Appends a segment running from the current last boundary (or zero)
    /// to `end`.
    pub fn append_segment(&mut self, end: f32) -> &Segment {
        let start = self.segments.last().map_or(0.0, |s| s.end);
        self.add_segment(start, end)
    }

    /// Removes the segment at `index`. A following segment absorbs the
    /// removed one's span (its start moves left) so no hole is left in the
    /// timeline; the removed segment's side files are deleted.
    pub fn remove_segment(&mut self, index: usize) -> bool {
        if index >= self.segments.len() {
            return false;
        }

        let removed = self.segments[index];

        if index + 1 < self.segments.len() {
            let next = self.segments[index + 1];
            self.rename_side_files(&next, removed.start, next.end);
            self.segments[index + 1].start = removed.start;
        }

        self.delete_side_files(&removed);
        self.segments.remove(index);
        true
    }

    pub fn remove_segment_having_end_boundary(&mut self, end_boundary: f32) -> bool {
        match self.segment_having_end_boundary(end_boundary) {
            Some(index) => self.remove_segment(index),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Boundary edits
    // ------------------------------------------------------------------

    /// Moves the end boundary of the segment at `index` to `new_end`,
    /// pulling the following segment's start along to keep adjacency.
    pub fn change_end_boundary(&mut self, index: usize, new_end: f32) -> BoundaryModification {
        let Some(&segment) = self.segments.get(index) else {
            return BoundaryModification::SegmentNotFound;
        };

        // New boundary must leave at least the minimum on both sides.
        if segment.start >= new_end - MIN_SEGMENT_SECONDS {
            return BoundaryModification::SegmentWillBeTooShort;
        }

        if index + 1 < self.segments.len() {
            let next = self.segments[index + 1];
            if new_end + MIN_SEGMENT_SECONDS >= next.end {
                return BoundaryModification::NextSegmentWillBeTooShort;
            }

            self.rename_side_files(&next, new_end, next.end);
            self.segments[index + 1].start = new_end;
        }

        self.rename_side_files(&segment, segment.start, new_end);
        self.segments[index].end = new_end;

        BoundaryModification::Success
    }

    /// Looks up the segment ending at `old_end` and moves that boundary.
    pub fn change_end_boundary_by_old_end(
        &mut self,
        old_end: f32,
        new_end: f32,
    ) -> BoundaryModification {
        match self.segment_having_end_boundary(old_end) {
            Some(index) => self.change_end_boundary(index, new_end),
            None => BoundaryModification::SegmentNotFound,
        }
    }

    /// Splits the segment enclosing `new_boundary` in two, or appends a new
    /// trailing segment when no segment encloses it.
    pub fn insert_boundary(&mut self, new_boundary: f32) -> BoundaryModification {
        let Some(index) = self.segment_enclosing_time(new_boundary) else {
            let new_start = self.segments.last().map_or(0.0, |s| s.end);
            if new_start >= new_boundary - MIN_SEGMENT_SECONDS {
                return BoundaryModification::SegmentWillBeTooShort;
            }
            self.add_segment(new_start, new_boundary);
            return BoundaryModification::Success;
        };

        let segment = self.segments[index];

        if segment.start >= new_boundary - MIN_SEGMENT_SECONDS {
            return BoundaryModification::SegmentWillBeTooShort;
        }
        if new_boundary + MIN_SEGMENT_SECONDS >= segment.end {
            return BoundaryModification::NextSegmentWillBeTooShort;
        }

        self.rename_side_files(&segment, segment.start, new_boundary);

        let tail_end = segment.end;
        self.segments[index].end = new_boundary;
        self.segments
            .insert(index + 1, Segment::new(new_boundary, tail_end));

        BoundaryModification::Success
    }

    // ------------------------------------------------------------------
    // Boundary-move feasibility
    // ------------------------------------------------------------------

    /// Whether the boundary at `boundary` could move `seconds` to the left
    /// without violating the minimum segment length.
    pub fn can_boundary_move_left(&self, boundary: f32, seconds: f32) -> bool {
        let new_boundary = boundary - seconds;
        let segment = self
            .segment_enclosing_time(boundary)
            .map(|i| self.segments[i]);

        new_boundary > 0.0
            && segment.map_or(true, |s| new_boundary > s.start + MIN_SEGMENT_SECONDS)
    }

    /// Whether the boundary at `boundary` could move `seconds` to the right
    /// without crossing `limit` (e.g. total duration) or squeezing the
    /// segment to its right below the minimum.
    pub fn can_boundary_move_right(&self, boundary: f32, seconds: f32, limit: f32) -> bool {
        let new_boundary = boundary + seconds;
        if new_boundary <= 0.0 || new_boundary > limit {
            return false;
        }

        if let Some(index) = self.segment_having_end_boundary(boundary) {
            return index == self.segments.len() - 1
                || new_boundary <= self.segments[index + 1].end - MIN_SEGMENT_SECONDS;
        }

        self.segment_enclosing_time(boundary)
            .map_or(true, |i| new_boundary <= self.segments[i].end - MIN_SEGMENT_SECONDS)
    }

    // ------------------------------------------------------------------
    // Side files
    // ------------------------------------------------------------------

    pub fn careful_speech_path(&self, segment: &Segment) -> PathBuf {
        self.side_files.path_for(segment, SideFileRole::CarefulSpeech)
    }

    pub fn oral_translation_path(&self, segment: &Segment) -> PathBuf {
        self.side_files
            .path_for(segment, SideFileRole::OralTranslation)
    }

    pub fn side_file_folder(&self) -> &Path {
        self.side_files.folder()
    }

    fn rename_side_files(&mut self, old: &Segment, new_start: f32, new_end: f32) {
        let failed = self
            .side_files
            .rename(old, new_start, new_end, self.backup.as_ref());
        self.side_file_failures.extend(failed);
    }

    fn delete_side_files(&mut self, segment: &Segment) {
        let failed = self.side_files.delete(segment, self.backup.as_ref());
        self.side_file_failures.extend(failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tier() -> TimeTier {
        TimeTier::new(Path::new("/tmp/session.wav"))
    }

    fn tier_with(segments: &[(f32, f32)]) -> TimeTier {
        let mut t = tier();
        for &(start, end) in segments {
            t.add_segment(start, end);
        }
        t
    }

    fn boundaries(t: &TimeTier) -> Vec<(f32, f32)> {
        t.segments().iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_append_segment_chains_from_last_end() {
        let mut t = tier();
        t.append_segment(4.0);
        t.append_segment(9.5);
        assert_eq!(boundaries(&t), vec![(0.0, 4.0), (4.0, 9.5)]);
    }

    #[test]
    fn test_lookups() {
        let t = tier_with(&[(0.0, 4.0), (4.0, 9.5)]);
        assert_eq!(t.segment_having_end_boundary(4.0), Some(0));
        assert_eq!(t.segment_having_end_boundary(5.0), None);
        assert_eq!(t.segment_enclosing_time(4.0), Some(0));
        assert_eq!(t.segment_enclosing_time(4.1), Some(1));
        assert_eq!(t.segment_enclosing_time(0.0), None);
        let second = t.segments()[1];
        assert_eq!(t.index_of_segment(&second), Some(1));
    }

    #[test]
    fn test_insert_boundary_splits_segment() {
        // Scenario: one segment [0, 10); inserting 4 gives [0,4) and [4,10).
        let mut t = tier_with(&[(0.0, 10.0)]);
        assert_eq!(t.insert_boundary(4.0), BoundaryModification::Success);
        assert_eq!(boundaries(&t), vec![(0.0, 4.0), (4.0, 10.0)]);
    }

    #[test]
    fn test_insert_boundary_rejects_short_head() {
        // [0, 0.3) would fall below the half-second minimum.
        let mut t = tier_with(&[(0.0, 10.0)]);
        assert_eq!(
            t.insert_boundary(0.3),
            BoundaryModification::SegmentWillBeTooShort
        );
        assert_eq!(boundaries(&t), vec![(0.0, 10.0)]);
    }

    #[test]
    fn test_insert_boundary_rejects_short_tail() {
        let mut t = tier_with(&[(0.0, 10.0)]);
        assert_eq!(
            t.insert_boundary(9.8),
            BoundaryModification::NextSegmentWillBeTooShort
        );
        assert_eq!(boundaries(&t), vec![(0.0, 10.0)]);
    }

    #[test]
    fn test_insert_boundary_appends_trailing_segment() {
        let mut t = tier_with(&[(0.0, 10.0)]);
        assert_eq!(t.insert_boundary(15.0), BoundaryModification::Success);
        assert_eq!(boundaries(&t), vec![(0.0, 10.0), (10.0, 15.0)]);
    }

    #[test]
    fn test_insert_boundary_on_empty_tier_appends_from_zero() {
        let mut t = tier();
        assert_eq!(t.insert_boundary(3.0), BoundaryModification::Success);
        assert_eq!(boundaries(&t), vec![(0.0, 3.0)]);
    }

    #[test]
    fn test_insert_boundary_trailing_too_short() {
        let mut t = tier_with(&[(0.0, 10.0)]);
        assert_eq!(
            t.insert_boundary(10.2),
            BoundaryModification::SegmentWillBeTooShort
        );
        assert_eq!(boundaries(&t), vec![(0.0, 10.0)]);
    }

    #[test]
    fn test_split_then_remove_round_trips() {
        let mut t = tier_with(&[(0.0, 10.0)]);
        assert_eq!(t.insert_boundary(4.0), BoundaryModification::Success);
        assert!(t.remove_segment(0));
        assert_eq!(boundaries(&t), vec![(0.0, 10.0)]);
    }

    #[test]
    fn test_remove_first_of_three_absorbs_leftward() {
        // Scenario: removing the first of [0,5),[5,9),[9,20) yields
        // [0,9),[9,20).
        let mut t = tier_with(&[(0.0, 5.0), (5.0, 9.0), (9.0, 20.0)]);
        assert!(t.remove_segment(0));
        assert_eq!(boundaries(&t), vec![(0.0, 9.0), (9.0, 20.0)]);
    }

    #[test]
    fn test_remove_last_segment_leaves_rest_untouched() {
        let mut t = tier_with(&[(0.0, 5.0), (5.0, 9.0)]);
        assert!(t.remove_segment(1));
        assert_eq!(boundaries(&t), vec![(0.0, 5.0)]);
    }

    #[test]
    fn test_remove_out_of_range_is_false() {
        let mut t = tier_with(&[(0.0, 5.0)]);
        assert!(!t.remove_segment(3));
        assert_eq!(boundaries(&t), vec![(0.0, 5.0)]);
    }

    #[test]
    fn test_remove_by_end_boundary() {
        let mut t = tier_with(&[(0.0, 5.0), (5.0, 9.0)]);
        assert!(t.remove_segment_having_end_boundary(5.0));
        assert_eq!(boundaries(&t), vec![(0.0, 9.0)]);
        assert!(!t.remove_segment_having_end_boundary(5.0));
    }

    #[test]
    fn test_change_end_boundary_moves_next_start() {
        let mut t = tier_with(&[(0.0, 5.0), (5.0, 9.0)]);
        assert_eq!(t.change_end_boundary(0, 6.0), BoundaryModification::Success);
        assert_eq!(boundaries(&t), vec![(0.0, 6.0), (6.0, 9.0)]);
    }

    #[test]
    fn test_change_end_boundary_rejects_short_segment() {
        let mut t = tier_with(&[(0.0, 5.0), (5.0, 9.0)]);
        assert_eq!(
            t.change_end_boundary(0, 0.4),
            BoundaryModification::SegmentWillBeTooShort
        );
        assert_eq!(boundaries(&t), vec![(0.0, 5.0), (5.0, 9.0)]);
    }

    #[test]
    fn test_change_end_boundary_rejects_short_next_segment() {
        let mut t = tier_with(&[(0.0, 5.0), (5.0, 9.0)]);
        assert_eq!(
            t.change_end_boundary(0, 8.7),
            BoundaryModification::NextSegmentWillBeTooShort
        );
        assert_eq!(boundaries(&t), vec![(0.0, 5.0), (5.0, 9.0)]);
    }

    #[test]
    fn test_change_end_boundary_unknown_index() {
        let mut t = tier_with(&[(0.0, 5.0)]);
        assert_eq!(
            t.change_end_boundary(7, 4.0),
            BoundaryModification::SegmentNotFound
        );
    }

    #[test]
    fn test_change_end_boundary_by_old_end() {
        let mut t = tier_with(&[(0.0, 5.0), (5.0, 9.0)]);
        assert_eq!(
            t.change_end_boundary_by_old_end(5.0, 6.0),
            BoundaryModification::Success
        );
        assert_eq!(
            t.change_end_boundary_by_old_end(5.0, 6.0),
            BoundaryModification::SegmentNotFound
        );
    }

    #[test]
    fn test_can_boundary_move_left() {
        let t = tier_with(&[(0.0, 5.0), (5.0, 9.0)]);
        assert!(t.can_boundary_move_left(5.0, 1.0));
        // Would land on segment start + minimum.
        assert!(!t.can_boundary_move_left(5.0, 4.5));
        // Would land at or below zero.
        assert!(!t.can_boundary_move_left(3.0, 3.0));
        // Outside any segment, only the zero floor applies.
        assert!(t.can_boundary_move_left(20.0, 1.0));
    }

    #[test]
    fn test_can_boundary_move_right() {
        let t = tier_with(&[(0.0, 5.0), (5.0, 9.0)]);
        assert!(t.can_boundary_move_right(5.0, 1.0, 20.0));
        // Squeezes the following segment below the minimum.
        assert!(!t.can_boundary_move_right(5.0, 3.7, 20.0));
        // The last end boundary is only capped by the limit.
        assert!(t.can_boundary_move_right(9.0, 10.0, 20.0));
        assert!(!t.can_boundary_move_right(9.0, 12.0, 20.0));
        // Interior position inside a segment.
        assert!(t.can_boundary_move_right(6.0, 1.0, 20.0));
        assert!(!t.can_boundary_move_right(6.0, 2.8, 20.0));
    }

    #[test]
    fn test_boundary_change_renames_side_files() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("session.wav");
        let mut t = TimeTier::new(&media);
        fs::create_dir_all(t.side_file_folder()).unwrap();

        t.add_segment(0.0, 5.0);
        t.add_segment(5.0, 9.0);

        let first = t.segments()[0];
        let second = t.segments()[1];
        fs::write(t.careful_speech_path(&first), b"a").unwrap();
        fs::write(t.oral_translation_path(&second), b"b").unwrap();

        assert_eq!(t.change_end_boundary(0, 6.0), BoundaryModification::Success);

        let new_first = t.segments()[0];
        let new_second = t.segments()[1];
        assert!(t.careful_speech_path(&new_first).exists());
        assert!(t.oral_translation_path(&new_second).exists());
        assert!(!t.careful_speech_path(&first).exists());
        assert!(t.side_file_failures().is_empty());
    }

    #[test]
    fn test_remove_segment_deletes_side_files() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("session.wav");
        let mut t = TimeTier::new(&media);
        fs::create_dir_all(t.side_file_folder()).unwrap();

        t.add_segment(0.0, 5.0);
        let segment = t.segments()[0];
        fs::write(t.careful_speech_path(&segment), b"a").unwrap();

        assert!(t.remove_segment(0));
        assert!(!t.careful_speech_path(&segment).exists());
        assert!(t.side_file_failures().is_empty());
    }
}
