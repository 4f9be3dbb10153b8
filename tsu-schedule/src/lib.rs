pub use dom::{Dom, NodeId};
pub use grid::{Grid, GRID_ID};
pub use legend::LEGEND_ID;
pub use lesson::{Grouping, Lesson, LessonType, Variant};
pub use pass::{render_pass, PassSummary};
pub use query::{DocumentMut, DocumentQuery, Observable};
pub use watcher::ChangeWatcher;

pub mod dom;
pub mod grid;
pub mod legend;
pub mod lesson;
pub mod parser;
mod pass;
pub mod query;
#[cfg(test)]
mod test;
mod watcher;
