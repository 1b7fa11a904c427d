use crate::cue::CueId;
use crate::error::CueError;

use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{digit1, one_of, space0, space1};
use nom::combinator::{eof, map, map_res, opt, peek, rest};
use nom::error::{convert_error, ErrorKind, VerboseError};
use nom::sequence::{preceded, terminated};
use nom::{branch::alt, error_position, Err, IResult};

/// One line of an editing session.
///
/// Times are kept as typed; they are validated when the command is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add,
    Start(CueId, String),
    End(CueId, String),
    /// Everything after the single separator following the id is kept,
    /// including leading and trailing blanks.
    Text(CueId, String),
    Delete(CueId),
    /// 1-based positions, as shown by `list`.
    Move(usize, usize),
    List,
    Preview,
    Show(String),
    Export(Option<String>),
}

pub struct Parser {
    line_no: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self { line_no: 0 }
    }

    /// Parses the next line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(&mut self, line: &str) -> Result<Option<Command>, CueError> {
        self.line_no += 1;
        let line = line.strip_suffix('\r').unwrap_or(line).trim_start();
        if line.trim_end().is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        match terminated(command, preceded(space0, end_of_line))(line) {
            Ok((_, cmd)) => Ok(Some(cmd)),
            Err(Err::Error(err)) | Err(Err::Failure(err)) => {
                let conv = convert_error(line, err);
                Err(CueError::ParseError(format!(
                    "Unrecognised command on line {}:\n{}",
                    self.line_no, conv
                )))
            }
            Err(Err::Incomplete(_)) => {
                unreachable!("Incomplete data received by non-streaming parser.")
            }
        }
    }
}

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

fn command(input: &str) -> Res<Command> {
    alt((
        add, set_start, set_end, set_text, delete, reorder, list, preview, show, export,
    ))(input)
}

fn end_of_line(input: &str) -> Res<&str> {
    if input.is_empty() {
        Ok((input, input))
    } else {
        std::result::Result::Err(Err::Error(error_position!(input, ErrorKind::Eof)))
    }
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    terminated(tag(word), peek(alt((space1, eof))))
}

fn cue_id(input: &str) -> Res<CueId> {
    map_res(digit1, |s: &str| s.parse())(input)
}

fn position(input: &str) -> Res<usize> {
    map_res(digit1, |s: &str| s.parse())(input)
}

fn token(input: &str) -> Res<&str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

fn add(input: &str) -> Res<Command> {
    map(keyword("add"), |_| Command::Add)(input)
}

fn id_and_time<'a>(word: &'static str, input: &'a str) -> Res<'a, (CueId, String)> {
    let (input, _) = keyword(word)(input)?;
    let (input, id) = preceded(space1, cue_id)(input)?;
    let (input, time) = preceded(space1, token)(input)?;
    Ok((input, (id, time.to_string())))
}

fn set_start(input: &str) -> Res<Command> {
    let (input, (id, time)) = id_and_time("start", input)?;
    Ok((input, Command::Start(id, time)))
}

fn set_end(input: &str) -> Res<Command> {
    let (input, (id, time)) = id_and_time("end", input)?;
    Ok((input, Command::End(id, time)))
}

fn set_text(input: &str) -> Res<Command> {
    let (input, _) = keyword("text")(input)?;
    let (input, id) = preceded(space1, cue_id)(input)?;
    let (input, text) = opt(preceded(one_of(" \t"), rest))(input)?;
    // `\n` typed in the text stands for a line break.
    let text = text.unwrap_or("").replace("\\n", "\n");
    Ok((input, Command::Text(id, text)))
}

fn delete(input: &str) -> Res<Command> {
    let (input, _) = keyword("delete")(input)?;
    let (input, id) = preceded(space1, cue_id)(input)?;
    Ok((input, Command::Delete(id)))
}

fn reorder(input: &str) -> Res<Command> {
    let (input, _) = keyword("move")(input)?;
    let (input, from) = preceded(space1, position)(input)?;
    let (input, to) = preceded(space1, position)(input)?;
    Ok((input, Command::Move(from, to)))
}

fn list(input: &str) -> Res<Command> {
    map(keyword("list"), |_| Command::List)(input)
}

fn preview(input: &str) -> Res<Command> {
    map(keyword("preview"), |_| Command::Preview)(input)
}

fn show(input: &str) -> Res<Command> {
    let (input, _) = keyword("show")(input)?;
    let (input, time) = preceded(space1, token)(input)?;
    Ok((input, Command::Show(time.to_string())))
}

fn export(input: &str) -> Res<Command> {
    let (input, _) = keyword("export")(input)?;
    let (input, path) = opt(preceded(space1, rest))(input)?;
    Ok((input, Command::Export(path.map(|p| p.trim_end().to_string()))))
}
