pub mod json;
pub mod text;

pub use json::JsonReporter;
pub use text::TextReporter;

use crate::engine::ReplicationSession;

pub trait Reporter {
    fn report(&self, session: &ReplicationSession) -> String;
}
