pub mod entity;
pub mod item;
pub mod shop;
