use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::StoreError;

/// Single-key durable storage, the shape of the browser's `localStorage`
/// entry the widget persists into.
pub trait ConversationStore {
    fn read(&self) -> Option<String>;
    fn write(&mut self, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self { value: Some(value.into()) }
    }
}

impl ConversationStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, value: &str) -> Result<(), StoreError> {
        self.value = Some(value.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        self.value = None;
        Ok(())
    }
}

/// Keeps the conversation in one JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConversationStore for FileStore {
    fn read(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn write(&mut self, value: &str) -> Result<(), StoreError> {
        fs::write(&self.path, value)?;
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
