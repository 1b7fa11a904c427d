use crate::cue::{Cue, CueId};
use crate::error::CueError;
use crate::parser::{Command, Parser};
use crate::serialiser;
use crate::store::{CueEdit, CueStore};
use crate::timestamp::{self, Timestamp};
use crate::track::PreviewTrack;

use std::io::{BufRead, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::{info, warn};

/// An interactive editing session: reads commands, edits the cues and
/// answers on `out`.
pub struct Session<W: Write> {
    store: CueStore<PreviewTrack>,
    out: W,
    duration: Option<Duration>,
    unsaved: bool,
}

impl<W: Write> Session<W> {
    pub fn new(out: W) -> Self {
        Self {
            store: CueStore::new(PreviewTrack::new()),
            out,
            duration: None,
            unsaved: false,
        }
    }

    /// Sets the length of the video being captioned. Only used for warnings.
    pub fn with_duration(mut self, seconds: f64) -> Result<Self, CueError> {
        self.duration = Some(timestamp::duration_from_secs(seconds)?);
        Ok(self)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved && !(self.store.is_empty() && self.store.sink().is_empty())
    }

    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut parser = Parser::new();
        for line in input.lines() {
            let line = line.context("Failed to read from input")?;
            let outcome = match parser.parse_line(&line) {
                Ok(Some(cmd)) => self.apply(cmd),
                Ok(None) => continue,
                Err(err) => Err(err.into()),
            };
            if let Err(err) = outcome {
                match err.downcast_ref::<CueError>() {
                    Some(cue_err) => self.report(cue_err)?,
                    None => return Err(err),
                }
            }
        }
        self.out.flush().context("Failed to write to output")?;

        if let Some(msg) = self.unsaved_warning() {
            warn!("{}", msg);
        }
        Ok(())
    }

    fn unsaved_warning(&self) -> Option<String> {
        if self.has_unsaved_changes() {
            Some(format!(
                "Leaving with {} cue(s) that were never exported",
                self.store.len()
            ))
        } else {
            None
        }
    }

    fn report(&mut self, err: &CueError) -> Result<()> {
        warn!("{}", err);
        writeln!(self.out, "error: {}", err)?;
        Ok(())
    }

    fn apply(&mut self, cmd: Command) -> Result<()> {
        match cmd {
            Command::Add => {
                let cue = self.store.add_cue();
                self.unsaved = true;
                writeln!(self.out, "added cue {}", cue.id())?;
            }
            Command::Start(id, time) => {
                let secs = self.time_input(&time)?;
                self.store.update(id, CueEdit::StartTime(secs))?;
                self.unsaved = true;
                self.check_order(id);
            }
            Command::End(id, time) => {
                let secs = self.time_input(&time)?;
                self.store.update(id, CueEdit::EndTime(secs))?;
                self.unsaved = true;
                self.check_order(id);
            }
            Command::Text(id, text) => {
                self.store.update(id, CueEdit::Text(text))?;
                self.unsaved = true;
            }
            Command::Delete(id) => {
                self.store.delete(id)?;
                self.unsaved = true;
                writeln!(self.out, "deleted cue {}", id)?;
            }
            Command::Move(from, to) => {
                if from == 0 || to == 0 {
                    return Err(CueError::NotFound("positions start at 1".to_string()).into());
                }
                self.store.reorder(from - 1, to - 1)?;
                self.unsaved = true;
            }
            Command::List => self.list()?,
            Command::Preview => {
                write!(self.out, "{}", serialiser::serialise(self.store.snapshot()))?;
            }
            Command::Show(time) => {
                let at = timestamp::duration_from_secs(timestamp::parse_seconds(&time)?)?;
                self.show(at)?;
            }
            Command::Export(path) => self.export(path)?,
        }
        Ok(())
    }

    fn check_order(&self, id: CueId) {
        if let Some(cue) = self.store.get(id) {
            if cue.is_inverted() {
                warn!(
                    "Cue {} now ends ({}) before it starts ({})",
                    id,
                    Timestamp(cue.end()),
                    Timestamp(cue.start())
                );
            }
        }
    }

    /// Parses a typed time. Times past the end of the video are accepted.
    fn time_input(&self, input: &str) -> Result<f64, CueError> {
        let secs = timestamp::parse_seconds(input)?;
        let shown = timestamp::format(secs)?;
        if let Some(limit) = self.past_end(secs) {
            warn!(
                "{} is past the end of the video ({})",
                shown,
                Timestamp(limit)
            );
        }
        Ok(secs)
    }

    fn past_end(&self, secs: f64) -> Option<Duration> {
        self.duration.filter(|limit| secs > limit.as_secs_f64())
    }

    fn list(&mut self) -> Result<()> {
        if self.store.is_empty() {
            writeln!(self.out, "no cues")?;
            return Ok(());
        }
        for (i, cue) in self.store.snapshot().iter().enumerate() {
            writeln!(self.out, "{}", list_entry(i + 1, cue))?;
        }
        Ok(())
    }

    fn show(&mut self, at: Duration) -> Result<()> {
        let mut shown = 0;
        for cue in self.store.sink().active_at(at) {
            writeln!(self.out, "{}", cue.text())?;
            shown += 1;
        }
        if shown == 0 {
            writeln!(self.out, "(no caption)")?;
        }
        Ok(())
    }

    fn export(&mut self, path: Option<String>) -> Result<()> {
        let cues = self.store.snapshot();
        if path.as_deref() == Some("-") {
            write!(self.out, "{}", serialiser::serialise(cues))?;
        } else {
            let path = path.unwrap_or_else(default_export_name);
            serialiser::export(cues, &path)?;
            info!("Exported {} cue(s) to '{}'", cues.len(), path);
            writeln!(self.out, "exported {} cue(s) to {}", cues.len(), path)?;
        }
        self.unsaved = false;
        Ok(())
    }
}

fn list_entry(position: usize, cue: &Cue) -> String {
    format!(
        "{:>3}. [{}] {} --> {} {}",
        position,
        cue.id(),
        Timestamp(cue.start()),
        Timestamp(cue.end()),
        cue.text().replace('\n', "\\n")
    )
}

/// `<milliseconds since the epoch>.vtt`, so repeated exports don't collide.
fn default_export_name() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.vtt", now.as_millis())
}
