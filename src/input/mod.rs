//! Input processing module
//! Handles file detection, text extraction, resume parsing and input management

pub mod file_detector;
pub mod manager;
pub mod resume_parser;
pub mod text_extractor;

pub use manager::InputManager;
