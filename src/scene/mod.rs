pub mod desc;
pub mod display;
pub mod filter;
pub mod node;
pub mod tree;
