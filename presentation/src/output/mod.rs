//! Output formatting for the console

pub mod console;
