//! Menu loop and the actions behind each menu entry.

use std::io::{BufRead, Write};

use anyhow::Result;

use gradebook_core::config::DataLayout;
use gradebook_core::{AttemptKind, GradebookError, Registry};

use crate::console::Console;

mod attempts;
mod reports;
mod statistics;
mod students;

/// State shared by every action for the lifetime of the process.
pub struct Session {
    pub registry: Registry,
    pub layout: DataLayout,
}

/// What the menu loop does after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Input ended part-way through an action.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    AddStudent,
    RecordExam,
    RecordResit,
    ViewStudent,
    SearchByName,
    ListStudents,
    Marksheet,
    Transcript,
    Statistics,
    AttemptHistory,
    Exit,
}

impl MenuChoice {
    const ALL: [MenuChoice; 11] = [
        MenuChoice::AddStudent,
        MenuChoice::RecordExam,
        MenuChoice::RecordResit,
        MenuChoice::ViewStudent,
        MenuChoice::SearchByName,
        MenuChoice::ListStudents,
        MenuChoice::Marksheet,
        MenuChoice::Transcript,
        MenuChoice::Statistics,
        MenuChoice::AttemptHistory,
        MenuChoice::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuChoice::AddStudent => "Add student",
            MenuChoice::RecordExam => "Record exam (first attempt)",
            MenuChoice::RecordResit => "Record resit",
            MenuChoice::ViewStudent => "View student",
            MenuChoice::SearchByName => "Search students by name",
            MenuChoice::ListStudents => "List all students",
            MenuChoice::Marksheet => "Generate marksheet",
            MenuChoice::Transcript => "Generate transcript",
            MenuChoice::Statistics => "Class statistics",
            MenuChoice::AttemptHistory => "Attempt history",
            MenuChoice::Exit => "Exit",
        }
    }

    /// Parse a 1-based menu number.
    fn parse(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }
}

/// Run the menu until the operator exits or input ends.
pub fn run<R: BufRead, W: Write>(session: &mut Session, console: &mut Console<R, W>) -> Result<()> {
    loop {
        print_menu(console)?;
        let Some(input) = console.prompt("Choice: ")? else {
            console.blank()?;
            break;
        };

        let choice = match MenuChoice::parse(&input) {
            Some(MenuChoice::Exit) => {
                console.line("Goodbye.")?;
                break;
            }
            Some(choice) => choice,
            None => {
                console.line(format!(
                    "Invalid choice, enter a number from 1 to {}.",
                    MenuChoice::ALL.len()
                ))?;
                continue;
            }
        };

        console.blank()?;
        match dispatch(choice, session, console) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => {
                console.blank()?;
                break;
            }
            Err(e) => report_error(console, &e)?,
        }
    }
    Ok(())
}

fn dispatch<R: BufRead, W: Write>(
    choice: MenuChoice,
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<Flow> {
    match choice {
        MenuChoice::AddStudent => students::add(session, console),
        MenuChoice::RecordExam => attempts::record(session, console, AttemptKind::FirstAttempt),
        MenuChoice::RecordResit => attempts::record(session, console, AttemptKind::Resit),
        MenuChoice::ViewStudent => students::view(session, console),
        MenuChoice::SearchByName => students::search(session, console),
        MenuChoice::ListStudents => students::list(session, console),
        MenuChoice::Marksheet => reports::marksheet(session, console),
        MenuChoice::Transcript => reports::transcript(session, console),
        MenuChoice::Statistics => statistics::show(session, console),
        MenuChoice::AttemptHistory => students::history(session, console),
        MenuChoice::Exit => Ok(Flow::Exit),
    }
}

fn print_menu<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<()> {
    console.blank()?;
    console.line("===== Student Records =====")?;
    for (i, choice) in MenuChoice::ALL.iter().enumerate() {
        console.line(format!("{:>2}. {}", i + 1, choice.label()))?;
    }
    Ok(())
}

/// Tell the operator why an action stopped. The menu carries on afterwards.
fn report_error<R: BufRead, W: Write>(console: &mut Console<R, W>, err: &anyhow::Error) -> Result<()> {
    match err.downcast_ref::<GradebookError>() {
        Some(GradebookError::Validation(msg)) => console.line(format!("Invalid input: {msg}")),
        Some(e) if e.is_user_error() => console.line(format!("Not found: {e}")),
        Some(e) => {
            tracing::error!("{e}");
            console.line(format!("Storage error: {e}"))
        }
        None => {
            tracing::error!("{err:#}");
            console.line(format!("Error: {err:#}"))
        }
    }
}
