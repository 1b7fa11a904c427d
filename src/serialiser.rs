use crate::cue::Cue;
use crate::timestamp::write_ts;

use std::fmt;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;

const HEADER: &str = "WEBVTT";

/// Renders the cues, in the given order, as a WebVTT document.
pub fn serialise(cues: &[Cue]) -> String {
    let mut doc = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut doc, cues);
    doc
}

pub fn write_document<W: fmt::Write>(buf: &mut W, cues: &[Cue]) -> fmt::Result {
    writeln!(buf, "{}", HEADER)?;
    for cue in cues {
        writeln!(buf)?;
        write_cue(buf, cue)?;
    }
    writeln!(buf)
}

fn write_cue<W: fmt::Write>(buf: &mut W, cue: &Cue) -> fmt::Result {
    write_ts(buf, cue.start)?;
    write!(buf, " --> ")?;
    write_ts(buf, cue.end)?;
    writeln!(buf)?;
    writeln!(buf, "{}", cue.text)
}

/// Writes the document to `output`, replacing any existing file.
pub fn export<P: AsRef<Path>>(cues: &[Cue], output: P) -> Result<()> {
    let output = output.as_ref();
    for cue in cues.iter().filter(|c| c.is_inverted()) {
        warn!("Cue {} ends before it starts", cue.id);
    }

    let file = std::fs::File::create(output)
        .context(format!("Failed to create file: '{}'", output.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(serialise(cues).as_bytes())
        .context("Failed to write to output file.")?;
    writer.flush().context("Failed to write to output file.")?;
    Ok(())
}
