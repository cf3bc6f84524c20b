//! Library components of the `gleaner` command-line tool.

pub mod load;
pub mod logging;
