//! Class statistics display.

use std::io::{BufRead, Write};

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradebook_core::statistics::compute_statistics;

use super::{Flow, Session};
use crate::console::Console;

pub fn show<R: BufRead, W: Write>(session: &mut Session, console: &mut Console<R, W>) -> Result<Flow> {
    let Some(stats) = compute_statistics(session.registry.list()) else {
        console.line("No exam records yet.")?;
        return Ok(Flow::Continue);
    };

    console.line(format!(
        "Students with results : {} of {}",
        stats.students_with_records, stats.total_students
    ))?;
    console.line(format!(
        "Passed / failed       : {} / {}",
        stats.passed, stats.failed
    ))?;
    console.line(format!("Pass rate             : {:.1}%", stats.pass_rate))?;
    console.line(format!("Class average         : {:.2}", stats.class_average))?;
    console.line(format!("Highest average       : {:.2}", stats.highest_average))?;
    console.line(format!("Lowest average        : {:.2}", stats.lowest_average))?;

    let mut table = Table::new();
    table.set_header(vec!["Grade", "Students"]);
    for (grade, count) in &stats.grade_distribution {
        table.add_row(vec![Cell::new(grade), Cell::new(count)]);
    }
    console.line("Grade distribution (best attempts):")?;
    console.line(table)?;
    Ok(Flow::Continue)
}
