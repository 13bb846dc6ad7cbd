pub mod array;
pub mod dims;
pub mod generator;
pub mod grid;
pub mod progress;
pub mod search;
