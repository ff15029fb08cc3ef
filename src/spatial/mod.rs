pub mod query;

pub use query::{entities_within, nearest_visible, nearest_within, visible_within};
