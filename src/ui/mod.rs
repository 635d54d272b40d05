pub mod console;
pub mod panels;
