use crate::cue::{Cue, CueId};

use std::time::Duration;

/// Something that paints cues over the video while it plays.
///
/// The store is the authority over which cues exist; a sink only mirrors
/// what it is told.
pub trait CaptionSink {
    fn add(&mut self, cue: &Cue);

    fn remove(&mut self, id: &CueId);

    /// Called after a field of an already registered cue changed.
    fn update(&mut self, cue: &Cue) {
        self.remove(&cue.id);
        self.add(cue);
    }
}

/// In-process caption track used for previewing.
///
/// Keeps its cues ordered by start time. Cues starting together stay in
/// the order they were added.
#[derive(Debug, Default)]
pub struct PreviewTrack {
    cues: Vec<Cue>,
}

impl PreviewTrack {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, id: &CueId) -> bool {
        self.cues.iter().any(|c| &c.id == id)
    }

    #[cfg(test)]
    pub fn get(&self, id: &CueId) -> Option<&Cue> {
        self.cues.iter().find(|c| &c.id == id)
    }

    /// The cues that are on screen at `time`.
    pub fn active_at(&self, time: Duration) -> impl Iterator<Item = &Cue> {
        self.cues
            .iter()
            .take_while(move |c| c.start <= time)
            .filter(move |c| time < c.end)
    }
}

impl CaptionSink for PreviewTrack {
    fn add(&mut self, cue: &Cue) {
        let at = self.cues.partition_point(|c| c.start <= cue.start);
        self.cues.insert(at, cue.clone());
    }

    fn remove(&mut self, id: &CueId) {
        if let Some(pos) = self.cues.iter().position(|c| &c.id == id) {
            self.cues.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(id: u64, start: u64, end: u64, text: &str) -> Cue {
        Cue {
            id: CueId::new(id),
            start: Duration::from_secs(start),
            end: Duration::from_secs(end),
            text: text.to_string(),
        }
    }

    fn active_texts(track: &PreviewTrack, secs: u64) -> Vec<&str> {
        track
            .active_at(Duration::from_secs(secs))
            .map(|c| c.text.as_str())
            .collect()
    }

    #[test]
    fn keeps_cues_ordered_by_start() {
        let mut track = PreviewTrack::new();
        track.add(&cue(1, 10, 12, "late"));
        track.add(&cue(2, 0, 3, "early"));
        track.add(&cue(3, 10, 11, "late too"));

        let order: Vec<&str> = track.cues.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(order, vec!["early", "late", "late too"]);
    }

    #[test]
    fn active_at_uses_half_open_ranges() {
        let mut track = PreviewTrack::new();
        track.add(&cue(1, 0, 5, "first"));
        track.add(&cue(2, 5, 8, "second"));
        track.add(&cue(3, 4, 6, "overlap"));

        assert_eq!(active_texts(&track, 0), vec!["first"]);
        assert_eq!(active_texts(&track, 4), vec!["first", "overlap"]);
        assert_eq!(active_texts(&track, 5), vec!["overlap", "second"]);
        assert!(active_texts(&track, 8).is_empty());
    }

    #[test]
    fn zero_length_and_inverted_cues_never_show() {
        let mut track = PreviewTrack::new();
        track.add(&cue(1, 0, 0, ""));
        track.add(&cue(2, 6, 3, "backwards"));

        assert!(active_texts(&track, 0).is_empty());
        assert!(active_texts(&track, 4).is_empty());
        assert_eq!(track.len(), 2);
    }

    #[test]
    fn update_moves_the_cue() {
        let mut track = PreviewTrack::new();
        track.add(&cue(1, 0, 2, "a"));
        track.add(&cue(2, 3, 4, "b"));

        track.update(&cue(1, 5, 6, "a moved"));

        assert_eq!(track.len(), 2);
        assert_eq!(active_texts(&track, 5), vec!["a moved"]);
        assert!(active_texts(&track, 1).is_empty());
    }

    #[test]
    fn remove_unknown_is_ignored() {
        let mut track = PreviewTrack::new();
        track.add(&cue(1, 0, 2, "a"));
        track.remove(&CueId::new(9));
        assert!(track.contains(&CueId::new(1)));
        assert_eq!(track.len(), 1);
    }
}
