pub mod dirty;
pub mod matrix;
pub mod region;
