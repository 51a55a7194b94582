pub mod catalog;
pub mod command;
pub mod health;
pub mod read;
pub mod write;
