use crate::cue::{Cue, CueId};
use crate::error::CueError;
use crate::timestamp;
use crate::track::CaptionSink;

use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum CueEdit {
    StartTime(f64),
    EndTime(f64),
    Text(String),
}

/// The ordered cues of one editing session.
///
/// Order is the order the user arranged them in and is never sorted by time.
/// Every cue in the store is registered with the sink, and nothing else is.
pub struct CueStore<S: CaptionSink> {
    cues: Vec<Cue>,
    next_id: u64,
    sink: S,
}

impl<S: CaptionSink> CueStore<S> {
    pub fn new(sink: S) -> Self {
        Self {
            cues: Vec::new(),
            next_id: 1,
            sink,
        }
    }

    pub fn add_cue(&mut self) -> Cue {
        let id = CueId::new(self.next_id);
        self.next_id += 1;

        let cue = Cue::empty(id);
        self.sink.add(&cue);
        self.cues.push(cue.clone());
        debug!("Added cue {} at position {}", id, self.cues.len());
        cue
    }

    pub fn update(&mut self, id: CueId, edit: CueEdit) -> Result<(), CueError> {
        let pos = self.position(id)?;
        // Validate before touching the cue so a rejected edit changes nothing.
        let cue = &mut self.cues[pos];
        match edit {
            CueEdit::StartTime(secs) => cue.start = timestamp::duration_from_secs(secs)?,
            CueEdit::EndTime(secs) => cue.end = timestamp::duration_from_secs(secs)?,
            CueEdit::Text(text) => cue.text = text,
        }
        self.sink.update(cue);
        debug!("Updated cue {}", id);
        Ok(())
    }

    pub fn delete(&mut self, id: CueId) -> Result<Cue, CueError> {
        let pos = self.position(id)?;
        let cue = self.cues.remove(pos);
        self.sink.remove(&cue.id);
        debug!("Deleted cue {} from position {}", id, pos + 1);
        Ok(cue)
    }

    /// Moves the cue at `from` to `to`, shifting the cues in between.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), CueError> {
        let len = self.cues.len();
        if from >= len || to >= len {
            return Err(CueError::NotFound(format!(
                "cannot move position {} to {}, there are {} cues",
                from, to, len
            )));
        }
        let cue = self.cues.remove(from);
        self.cues.insert(to, cue);
        debug!("Moved cue from position {} to {}", from + 1, to + 1);
        Ok(())
    }

    pub fn snapshot(&self) -> &[Cue] {
        &self.cues
    }

    pub fn get(&self, id: CueId) -> Option<&Cue> {
        self.cues.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn position(&self, id: CueId) -> Result<usize, CueError> {
        self.cues
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CueError::NotFound(format!("no cue with id {}", id)))
    }
}
