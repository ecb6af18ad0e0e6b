//! In-memory storage implementation, mainly for tests.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::Result;
use crate::storage::traits::{Storage, StorageError, StorageInput, StorageOutput};

type FileMap = Arc<Mutex<HashMap<String, Box<[u8]>>>>;

/// A storage that keeps every file in a shared map.
///
/// Written data becomes visible on `flush_and_sync` or when the output is
/// dropped. Renames and syncs can be made to fail, to exercise the error
/// paths of callers.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: FileMap,
    fail_renames: AtomicBool,
    fail_syncs: Arc<AtomicBool>,
    inputs_opened: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }

    /// Number of successful `open_input` calls so far.
    pub fn inputs_opened(&self) -> usize {
        self.inputs_opened.load(Ordering::SeqCst)
    }

    /// Sorted names of every stored file.
    pub fn list_files(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Replace the content of a file directly.
    pub fn put(&self, name: &str, data: impl Into<Box<[u8]>>) {
        self.files.lock().insert(name.to_string(), data.into());
    }

    /// Make every following `rename_file` call fail.
    pub fn fail_renames(&self, fail: bool) {
        self.fail_renames.store(fail, Ordering::SeqCst);
    }

    /// Make `flush_and_sync` fail on every output, open or future.
    pub fn fail_syncs(&self, fail: bool) {
        self.fail_syncs.store(fail, Ordering::SeqCst);
    }

    fn output(&self, name: &str, buffer: Vec<u8>) -> Box<dyn StorageOutput> {
        Box::new(MemoryOutput::new(
            name.to_string(),
            buffer,
            Arc::clone(&self.files),
            Arc::clone(&self.fail_syncs),
        ))
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let files = self.files.lock();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        self.inputs_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryInput::new(data.to_vec())))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        Ok(self.output(name, Vec::new()))
    }

    fn create_output_append(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        let existing = self
            .files
            .lock()
            .get(name)
            .map(|data| data.to_vec())
            .unwrap_or_default();

        Ok(self.output(name, existing))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.lock().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.files.lock().remove(name);
        Ok(())
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let files = self.files.lock();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(data.len() as u64)
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        if self.fail_renames.load(Ordering::SeqCst) {
            return Err(StorageError::IoError(format!(
                "rename {old_name} -> {new_name} refused"
            ))
            .into());
        }

        let mut files = self.files.lock();
        let data = files
            .remove(old_name)
            .ok_or_else(|| StorageError::FileNotFound(old_name.to_string()))?;

        files.insert(new_name.to_string(), data);
        Ok(())
    }

    fn create_temp_output(&self, prefix: &str) -> Result<(String, Box<dyn StorageOutput>)> {
        let mut files = self.files.lock();
        let temp_name = (0..=10000)
            .map(|counter| format!(".{prefix}_{counter}.tmp"))
            .find(|name| !files.contains_key(name))
            .ok_or_else(|| StorageError::IoError("Could not create temporary file".to_string()))?;

        // Reserve the name under the lock so concurrent callers pick another one.
        files.insert(temp_name.clone(), Box::default());
        drop(files);

        let output = self.output(&temp_name, Vec::new());
        Ok((temp_name, output))
    }

    fn location(&self, name: &str) -> String {
        format!("memory://{name}")
    }
}

/// A memory input implementation.
#[derive(Debug)]
pub struct MemoryInput {
    cursor: Cursor<Vec<u8>>,
    size: u64,
}

impl MemoryInput {
    fn new(data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        MemoryInput {
            cursor: Cursor::new(data),
            size,
        }
    }
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

/// A memory output implementation.
#[derive(Debug)]
pub struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    files: FileMap,
    fail_syncs: Arc<AtomicBool>,
    position: u64,
}

impl MemoryOutput {
    fn new(name: String, buffer: Vec<u8>, files: FileMap, fail_syncs: Arc<AtomicBool>) -> Self {
        let position = buffer.len() as u64;
        MemoryOutput {
            name,
            buffer,
            files,
            fail_syncs,
            position,
        }
    }

    fn publish(&self) {
        self.files
            .lock()
            .insert(self.name.clone(), self.buffer.clone().into_boxed_slice());
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.position += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        if self.fail_syncs.load(Ordering::SeqCst) {
            return Err(StorageError::IoError(format!("sync of {} refused", self.name)).into());
        }
        self.publish();
        Ok(())
    }

    fn position(&self) -> u64 {
        self.position
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        self.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::{read_all, write_atomic};

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();

        let mut output = storage.create_output("test.txt").unwrap();
        output.write_all(b"Hello, Memory!").unwrap();
        output.flush_and_sync().unwrap();
        drop(output);

        assert!(storage.file_exists("test.txt"));
        assert_eq!(storage.file_size("test.txt").unwrap(), 14);
        assert_eq!(read_all(&storage, "test.txt").unwrap(), b"Hello, Memory!");
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let storage = MemoryStorage::new();
        storage.put("log.jsonl", b"a\n".to_vec());

        let mut output = storage.create_output_append("log.jsonl").unwrap();
        assert_eq!(output.position(), 2);
        output.write_all(b"b\n").unwrap();
        drop(output);

        assert_eq!(read_all(&storage, "log.jsonl").unwrap(), b"a\nb\n");
    }

    #[test]
    fn test_rename_and_delete() {
        let storage = MemoryStorage::new();
        storage.put("old", b"x".to_vec());

        storage.rename_file("old", "new").unwrap();
        assert!(!storage.file_exists("old"));
        assert!(storage.file_exists("new"));

        storage.delete_file("new").unwrap();
        assert_eq!(storage.file_count(), 0);
        assert!(storage.rename_file("new", "other").is_err());
    }

    #[test]
    fn test_write_atomic_leaves_single_file() {
        let storage = MemoryStorage::new();
        write_atomic(&storage, "model.bin", b"payload").unwrap();

        assert_eq!(storage.list_files(), vec!["model.bin".to_string()]);
        assert_eq!(storage.location("model.bin"), "memory://model.bin");
    }

    #[test]
    fn test_write_atomic_failed_rename_keeps_old_file() {
        let storage = MemoryStorage::new();
        write_atomic(&storage, "model.bin", b"old model").unwrap();

        storage.fail_renames(true);
        assert!(write_atomic(&storage, "model.bin", b"new model").is_err());

        assert_eq!(read_all(&storage, "model.bin").unwrap(), b"old model");
        assert_eq!(storage.list_files(), vec!["model.bin".to_string()]);

        storage.fail_renames(false);
        write_atomic(&storage, "model.bin", b"new model").unwrap();
        assert_eq!(read_all(&storage, "model.bin").unwrap(), b"new model");
    }

    #[test]
    fn test_write_atomic_failed_sync_keeps_old_file() {
        let storage = MemoryStorage::new();
        write_atomic(&storage, "model.bin", b"old model").unwrap();

        storage.fail_syncs(true);
        assert!(write_atomic(&storage, "model.bin", b"new model").is_err());

        assert_eq!(read_all(&storage, "model.bin").unwrap(), b"old model");
        assert!(storage.list_files().iter().all(|name| !name.ends_with(".tmp")));
        assert_eq!(storage.file_count(), 1);
    }
}
