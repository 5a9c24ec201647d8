use std::fmt::Write;

use comfy_table::Cell;

use crate::matrix::Levels;

use super::styling::{paint, Tone};
use super::tables::{base_image_cell, create_table, cyan_header, optional_cell};

/// Prints the per-level job tables to stdout.
///
/// Used when the JSON goes to files, so stdout is free for humans.
pub fn print_summary(levels: &Levels) {
    println!("{}", render_summary(levels));
}

/// Prints the per-level job tables to stderr, keeping stdout for the JSON.
pub fn eprint_summary(levels: &Levels) {
    eprintln!("{}", render_summary(levels));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{emoji} {}", paint(Tone::Heading, title));
}

fn render_summary(levels: &Levels) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{} {} {}\n  {} {}\n",
        paint(Tone::Label, "Found"),
        paint(Tone::Count, levels.len()),
        paint(Tone::Label, "dependency levels"),
        paint(Tone::Label, "Jobs:"),
        paint(Tone::Count, levels.total_jobs()),
    );

    for (idx, jobs) in levels.iter().enumerate() {
        add_section_header(
            &mut output,
            "📦",
            &format!("Level {idx} ({} jobs)", jobs.len()),
        );

        if jobs.is_empty() {
            let _ = writeln!(output, "  {}\n", paint(Tone::Label, "No jobs at this level."));
            continue;
        }

        let mut table = create_table();
        table.set_header(cyan_header(&["#", "Repo", "Image", "Base Image"]));

        for (pos, job) in jobs.iter().enumerate() {
            table.add_row(vec![
                Cell::new(pos + 1),
                optional_cell(job.repo()),
                optional_cell(job.image()),
                base_image_cell(job.base_image()),
            ]);
        }

        let _ = writeln!(output, "{table}\n");
    }

    if levels.total_jobs() == 0 {
        let _ = writeln!(output, "{}", paint(Tone::Notice, "Nothing to build."));
    }

    output
}
