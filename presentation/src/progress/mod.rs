//! Progress reporting for rounds

pub mod reporter;
