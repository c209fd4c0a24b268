//! Input manager for resumes and job descriptions

use crate::error::{AtsError, Result};
use crate::input::file_detector::FileType;
use crate::input::resume_parser::ResumeParser;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::resume::ResumeRecord;
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
    parser: ResumeParser,
}

impl InputManager {
    pub fn new() -> Result<Self> {
        Ok(Self {
            cache: HashMap::new(),
            enable_cache: true,
            parser: ResumeParser::new()?,
        })
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Load a resume record.
    ///
    /// `.json` files hold a resume record and are validated field by field;
    /// PDF, text and markdown files are extracted and parsed.
    pub async fn load_resume(&mut self, path: &Path) -> Result<ResumeRecord> {
        match self.detect_file_type(path)? {
            FileType::Json => {
                let content = self.read_cached(path, FileType::Json).await?;
                info!("Loaded resume record from {}", path.display());
                ResumeRecord::from_json_str(&content)
            }
            file_type if file_type.is_text_document() => {
                let text = self.read_cached(path, file_type).await?;
                if text.trim().is_empty() {
                    return Err(AtsError::InvalidInput(format!(
                        "No text could be extracted from {}",
                        path.display()
                    )));
                }
                Ok(self.parser.parse(&text))
            }
            _ => Err(AtsError::UnsupportedFormat(format!(
                "Unsupported resume file: {}. Supported: json, pdf, txt, md",
                path.display()
            ))),
        }
    }

    /// Load a job description from a text or markdown file
    pub async fn load_job_description(&mut self, path: &Path) -> Result<String> {
        match self.detect_file_type(path)? {
            file_type @ (FileType::Text | FileType::Markdown) => self.read_cached(path, file_type).await,
            _ => Err(AtsError::UnsupportedFormat(format!(
                "Unsupported job description file: {}. Supported: txt, md",
                path.display()
            ))),
        }
    }

    /// Extract plain text from any supported document
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let file_type = self.detect_file_type(path)?;
        if file_type == FileType::Unknown {
            return Err(AtsError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }
        self.read_cached(path, file_type).await
    }

    async fn read_cached(&mut self, path: &Path, file_type: FileType) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(AtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Text | FileType::Json => {
                info!("Reading file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(AtsError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )))
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| AtsError::InvalidInput(format!("File has no extension: {}", path.display())))?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
