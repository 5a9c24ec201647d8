mod document;
mod job;
mod levels;
mod organizer;
mod placeholder;

pub use document::MatrixDocument;
pub use job::JobRecord;
pub use levels::Levels;
pub use organizer::{organize_by_levels, organize_by_levels_filtered};
