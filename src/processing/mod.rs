//! Resume scoring and analysis module

pub mod analyzer;
pub mod engine;
pub mod gap;
pub mod notes;
pub mod profiles;
pub mod recommendations;
pub mod resume;
pub mod sections;
pub mod text_processor;
pub mod vocabulary;
