mod exports;
mod styling;
mod summary;
mod tables;

pub use exports::{render_levels_json, write_level_files};
pub use styling::{paint, Tone};
pub use summary::{eprint_summary, print_summary};

/// Prints the joblevels banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        paint(Tone::Banner, "🧱 joblevels"),
        paint(Tone::Label, env!("CARGO_PKG_VERSION")),
        paint(Tone::Label, "CI matrix dependency levels")
    );
}
