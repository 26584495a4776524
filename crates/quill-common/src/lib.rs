pub mod ir;
pub mod message;
pub mod names;
