//! In-memory storage implementation.
//!
//! Primarily used by tests and short-lived indexes that never touch disk.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, RwLock};

use ahash::AHashMap;

use crate::error::Result;
use crate::storage::traits::{Storage, StorageConfig, StorageError, StorageInput, StorageOutput};

type FileMap = Arc<RwLock<AHashMap<String, Arc<Vec<u8>>>>>;

/// An in-memory storage implementation backed by a name → bytes map.
#[derive(Debug)]
pub struct MemoryStorage {
    files: FileMap,
    #[allow(dead_code)]
    config: StorageConfig,
    closed: bool,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new(config: StorageConfig) -> Self {
        MemoryStorage {
            files: Arc::new(RwLock::new(AHashMap::new())),
            config,
            closed: false,
        }
    }

    fn check_closed(&self) -> Result<()> {
        if self.closed {
            Err(StorageError::StorageClosed.into())
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(StorageConfig::default())
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        self.check_closed()?;

        let files = self.files.read().expect("storage lock poisoned");
        let data = files
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(Box::new(MemoryInput::new(data)))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        self.check_closed()?;

        Ok(Box::new(MemoryOutput::new(
            Arc::clone(&self.files),
            name.to_string(),
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        if self.closed {
            return false;
        }

        self.files
            .read()
            .expect("storage lock poisoned")
            .contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.check_closed()?;

        self.files.write().expect("storage lock poisoned").remove(name);
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        self.check_closed()?;

        let mut files: Vec<String> = self
            .files
            .read()
            .expect("storage lock poisoned")
            .keys()
            .cloned()
            .collect();
        files.sort();
        Ok(files)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        self.check_closed()?;

        let files = self.files.read().expect("storage lock poisoned");
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(data.len() as u64)
    }

    fn sync(&self) -> Result<()> {
        self.check_closed()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// A memory input reading from a shared byte buffer.
#[derive(Debug)]
pub struct MemoryInput {
    data: Arc<Vec<u8>>,
    position: u64,
}

impl MemoryInput {
    fn new(data: Arc<Vec<u8>>) -> Self {
        MemoryInput { data, position: 0 }
    }
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let start = self.position.min(self.data.len() as u64) as usize;
        let remaining = &self.data[start..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n as u64;
        Ok(n)
    }
}

impl Seek for MemoryInput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => self.data.len() as i64 + offset,
            SeekFrom::Current(offset) => self.position as i64 + offset,
        };

        if new_pos < 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek before start of stream",
            ));
        }

        self.position = new_pos as u64;
        Ok(self.position)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A memory output buffering writes and committing them on flush.
#[derive(Debug)]
pub struct MemoryOutput {
    files: FileMap,
    name: String,
    buffer: Cursor<Vec<u8>>,
}

impl MemoryOutput {
    fn new(files: FileMap, name: String) -> Self {
        MemoryOutput {
            files,
            name,
            buffer: Cursor::new(Vec::new()),
        }
    }

    fn commit(&mut self) {
        let data = Arc::new(self.buffer.get_ref().clone());
        self.files
            .write()
            .expect("storage lock poisoned")
            .insert(self.name.clone(), data);
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.commit();
        Ok(())
    }
}

impl Seek for MemoryOutput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.buffer.seek(pos)
    }
}

impl StorageOutput for MemoryOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.commit();
        Ok(())
    }

    fn position(&self) -> Result<u64> {
        Ok(self.buffer.position())
    }

    fn close(&mut self) -> Result<()> {
        self.commit();
        Ok(())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        self.commit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::default();

        let mut output = storage.create_output("test.txt").unwrap();
        output.write_all(b"hello memory").unwrap();
        output.close().unwrap();

        assert!(storage.file_exists("test.txt"));
        assert_eq!(storage.file_size("test.txt").unwrap(), 12);

        let mut input = storage.open_input("test.txt").unwrap();
        let mut content = String::new();
        input.read_to_string(&mut content).unwrap();
        assert_eq!(content, "hello memory");
    }

    #[test]
    fn test_memory_storage_list_and_delete() {
        let storage = MemoryStorage::default();

        for name in ["b.txt", "a.txt"] {
            let mut output = storage.create_output(name).unwrap();
            output.write_all(b"x").unwrap();
            output.close().unwrap();
        }

        assert_eq!(storage.list_files().unwrap(), vec!["a.txt", "b.txt"]);

        storage.delete_file("a.txt").unwrap();
        assert_eq!(storage.list_files().unwrap(), vec!["b.txt"]);
    }

    #[test]
    fn test_memory_storage_missing_file() {
        let storage = MemoryStorage::default();

        assert!(!storage.file_exists("missing.txt"));
        assert!(storage.open_input("missing.txt").is_err());
    }

    #[test]
    fn test_memory_input_seek() {
        let storage = MemoryStorage::default();

        let mut output = storage.create_output("seek.txt").unwrap();
        output.write_all(b"0123456789").unwrap();
        output.close().unwrap();

        let mut input = storage.open_input("seek.txt").unwrap();
        input.seek(SeekFrom::Start(5)).unwrap();
        let mut rest = String::new();
        input.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "56789");
    }
}
