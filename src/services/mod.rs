pub mod cache;
pub mod cleaner;
pub mod storytel;
pub mod title;
