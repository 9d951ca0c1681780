//! Marksheet and transcript generation.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::Local;

use gradebook_report::{write_marksheet, write_transcript};

use super::{Flow, Session};
use crate::console::Console;

pub fn marksheet<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<Flow> {
    let Some(id) = console.prompt("Student ID: ")? else {
        return Ok(Flow::Exit);
    };
    let student = session.registry.get(&id)?;
    let path = write_marksheet(
        student,
        &session.layout.marksheets,
        Local::now().date_naive(),
    )?;
    console.line(format!("Marksheet saved to {}", path.display()))?;
    Ok(Flow::Continue)
}

pub fn transcript<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<Flow> {
    let Some(id) = console.prompt("Student ID: ")? else {
        return Ok(Flow::Exit);
    };
    let student = session.registry.get(&id)?;
    let path = write_transcript(
        student,
        &session.layout.transcripts,
        Local::now().date_naive(),
    )?;
    console.line(format!("Transcript saved to {}", path.display()))?;
    Ok(Flow::Continue)
}
