pub mod build;
pub mod build_all;
pub mod discover;
pub mod tags;
