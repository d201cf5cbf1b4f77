pub mod access;
pub mod area;
pub mod memory;
pub mod position;
