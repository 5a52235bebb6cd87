//! Small helpers shared by tasks and the dev server.

pub mod mime;
pub mod path;
