//! Recording first attempts and resits.

use std::io::{BufRead, Write};

use anyhow::Result;

use gradebook_core::model::{Marks, Subject, SUBJECT_COUNT};
use gradebook_core::AttemptKind;
use gradebook_report::attempt_label;

use super::{Flow, Session};
use crate::console::Console;

pub fn record<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
    kind: AttemptKind,
) -> Result<Flow> {
    let Some(id) = console.prompt("Student ID: ")? else {
        return Ok(Flow::Exit);
    };

    // Check the attempt kind before prompting for marks.
    let sequence_number = session.registry.next_sequence_number(&id, kind)?;
    let name = session.registry.get(&id)?.name().to_string();
    console.line(format!(
        "Entering marks for {name}, attempt {sequence_number}:"
    ))?;

    let mut values = [0u8; SUBJECT_COUNT];
    for subject in Subject::ALL {
        let Some(mark) = console.prompt_mark(subject)? else {
            return Ok(Flow::Exit);
        };
        values[subject.index()] = mark;
    }
    let marks = Marks::new(values)?;

    let attempt = session.registry.record_attempt(&id, marks, kind)?;
    console.line(format!(
        "Recorded attempt {} ({}) for {}: average {:.2}, grade {}, {}",
        attempt.sequence_number(),
        attempt_label(&attempt),
        name,
        attempt.average(),
        attempt.grade(),
        attempt.status()
    ))?;
    Ok(Flow::Continue)
}
