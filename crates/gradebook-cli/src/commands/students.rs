//! Student creation, lookup, search and listing.

use std::io::{BufRead, Write};

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradebook_core::model::{Student, Subject};
use gradebook_report::attempt_label;

use super::{Flow, Session};
use crate::console::Console;

pub fn add<R: BufRead, W: Write>(session: &mut Session, console: &mut Console<R, W>) -> Result<Flow> {
    let Some(name) = console.prompt("Name: ")? else {
        return Ok(Flow::Exit);
    };
    let Some(email) = console.prompt("Email (optional): ")? else {
        return Ok(Flow::Exit);
    };

    let student = session.registry.create(&name, Some(email.as_str()))?;
    console.line(format!("Student created with ID {}", student.id()))?;
    Ok(Flow::Continue)
}

pub fn view<R: BufRead, W: Write>(session: &mut Session, console: &mut Console<R, W>) -> Result<Flow> {
    let Some(id) = console.prompt("Student ID: ")? else {
        return Ok(Flow::Exit);
    };
    let student = session.registry.get(&id)?;

    console.line(format!("ID       : {}", student.id()))?;
    console.line(format!("Name     : {}", student.name()))?;
    console.line(format!("Email    : {}", student.email().unwrap_or("-")))?;
    console.line(format!("Attempts : {}", student.attempts().len()))?;

    if let Some(latest) = student.latest_attempt() {
        console.line(format!(
            "Latest   : {} on {}, average {:.2}, grade {}, {}",
            attempt_label(latest),
            latest.timestamp().format("%Y-%m-%d"),
            latest.average(),
            latest.grade(),
            latest.status()
        ))?;
    }
    if let Some(best) = student.best_attempt() {
        console.line(format!(
            "Best     : {}, average {:.2}, grade {}, {}",
            attempt_label(best),
            best.average(),
            best.grade(),
            best.status()
        ))?;
    }
    Ok(Flow::Continue)
}

pub fn search<R: BufRead, W: Write>(session: &mut Session, console: &mut Console<R, W>) -> Result<Flow> {
    let Some(query) = console.prompt("Name contains: ")? else {
        return Ok(Flow::Exit);
    };
    let matches = session.registry.search_by_name(&query)?;

    if matches.is_empty() {
        console.line(format!("No students match '{}'.", query.trim()))?;
    } else {
        console.line(format!("{} match(es):", matches.len()))?;
        console.line(student_table(&matches))?;
    }
    Ok(Flow::Continue)
}

pub fn list<R: BufRead, W: Write>(session: &mut Session, console: &mut Console<R, W>) -> Result<Flow> {
    let students = session.registry.list();
    if students.is_empty() {
        console.line("No students on record.")?;
    } else {
        console.line(student_table(&students))?;
        console.line(format!("{} student(s)", students.len()))?;
    }
    Ok(Flow::Continue)
}

pub fn history<R: BufRead, W: Write>(session: &mut Session, console: &mut Console<R, W>) -> Result<Flow> {
    let Some(id) = console.prompt("Student ID: ")? else {
        return Ok(Flow::Exit);
    };
    let student = session.registry.get(&id)?;

    if !student.has_attempts() {
        console.line(format!("{} has no recorded attempts.", student.name()))?;
        return Ok(Flow::Continue);
    }

    let mut table = Table::new();
    let mut header = vec!["#".to_string(), "Date".to_string()];
    header.extend(Subject::ALL.iter().map(|s| s.name().to_string()));
    header.extend(["Average", "Grade", "Status"].map(String::from));
    table.set_header(header);

    for attempt in student.attempts() {
        let mut row = vec![
            Cell::new(attempt.sequence_number()),
            Cell::new(attempt.timestamp().format("%Y-%m-%d %H:%M")),
        ];
        row.extend(attempt.marks().iter().map(|(_, mark)| Cell::new(mark)));
        row.push(Cell::new(format!("{:.2}", attempt.average())));
        row.push(Cell::new(attempt.grade()));
        row.push(Cell::new(attempt.status()));
        table.add_row(row);
    }

    console.line(format!("Attempt history for {} ({})", student.name(), student.id()))?;
    console.line(table)?;
    Ok(Flow::Continue)
}

fn student_table(students: &[&Student]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Email", "Attempts", "Best Grade"]);
    for student in students {
        let best = student
            .best_attempt()
            .map(|a| a.grade().to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(student.id()),
            Cell::new(student.name()),
            Cell::new(student.email().unwrap_or("-")),
            Cell::new(student.attempts().len()),
            Cell::new(best),
        ]);
    }
    table
}
