//! File-based storage implementation.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{PantryError, Result};
use crate::storage::traits::{Storage, StorageConfig, StorageError, StorageInput, StorageOutput};

/// A file-based storage rooted at a directory.
#[derive(Debug)]
pub struct FileStorage {
    /// The root directory for storage.
    directory: PathBuf,
    /// Storage configuration.
    config: StorageConfig,
}

impl FileStorage {
    /// Create a new file storage in the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new<P: AsRef<Path>>(directory: P, config: StorageConfig) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            std::fs::create_dir_all(&directory)
                .map_err(|e| PantryError::storage(format!("Failed to create directory: {e}")))?;
        }

        if !directory.is_dir() {
            return Err(PantryError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileStorage { directory, config })
    }

    /// Open a storage over an existing directory without creating it.
    ///
    /// Readers use this so that a missing data directory surfaces as a
    /// missing file rather than being silently created.
    pub fn open<P: AsRef<Path>>(directory: P, config: StorageConfig) -> Self {
        FileStorage {
            directory: directory.as_ref().to_path_buf(),
            config,
        }
    }

    /// The root directory of this storage.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Get the full path for a file name.
    fn file_path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }

    fn ensure_directory(&self) -> Result<()> {
        if !self.directory.exists() {
            std::fs::create_dir_all(&self.directory)
                .map_err(|e| PantryError::storage(format!("Failed to create directory: {e}")))?;
        }
        Ok(())
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let path = self.file_path(name);
        let file = File::open(&path).map_err(|e| StorageError::from_io(name, e))?;

        Ok(Box::new(FileInput::new(file, self.config.buffer_size)?))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        self.ensure_directory()?;

        let path = self.file_path(name);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| StorageError::from_io(name, e))?;

        Ok(Box::new(FileOutput::new(
            file,
            self.config.buffer_size,
            self.config.sync_writes,
        )))
    }

    fn create_output_append(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        self.ensure_directory()?;

        let path = self.file_path(name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StorageError::from_io(name, e))?;

        Ok(Box::new(FileOutput::new(
            file,
            self.config.buffer_size,
            self.config.sync_writes,
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        let path = self.file_path(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| StorageError::IoError(format!("Failed to delete file: {e}")))?;
        }

        Ok(())
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let metadata = self
            .file_path(name)
            .metadata()
            .map_err(|e| StorageError::from_io(name, e))?;

        Ok(metadata.len())
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        let old_path = self.file_path(old_name);
        let new_path = self.file_path(new_name);

        std::fs::rename(&old_path, &new_path)
            .map_err(|e| StorageError::IoError(format!("Failed to rename file: {e}")))?;

        Ok(())
    }

    fn create_temp_output(&self, prefix: &str) -> Result<(String, Box<dyn StorageOutput>)> {
        self.ensure_directory()?;

        for counter in 0..=10000 {
            let temp_name = format!(".{prefix}_{counter}.tmp");
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.file_path(&temp_name));

            match opened {
                Ok(file) => {
                    let output = FileOutput::new(
                        file,
                        self.config.buffer_size,
                        self.config.sync_writes,
                    );
                    return Ok((temp_name, Box::new(output)));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(StorageError::from_io(&temp_name, e).into()),
            }
        }

        Err(StorageError::IoError("Could not create temporary file".to_string()).into())
    }

    fn location(&self, name: &str) -> String {
        self.file_path(name).display().to_string()
    }
}

/// A file input implementation.
#[derive(Debug)]
pub struct FileInput {
    reader: BufReader<File>,
    size: u64,
}

impl FileInput {
    fn new(file: File, buffer_size: usize) -> Result<Self> {
        let metadata = file
            .metadata()
            .map_err(|e| PantryError::storage(format!("Failed to get file metadata: {e}")))?;

        let size = metadata.len();
        let reader = BufReader::with_capacity(buffer_size, file);

        Ok(FileInput { reader, size })
    }
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl StorageInput for FileInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

/// A file output implementation.
#[derive(Debug)]
pub struct FileOutput {
    writer: BufWriter<File>,
    sync_writes: bool,
    position: u64,
}

impl FileOutput {
    fn new(file: File, buffer_size: usize, sync_writes: bool) -> Self {
        FileOutput {
            writer: BufWriter::with_capacity(buffer_size, file),
            sync_writes,
            position: 0,
        }
    }
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes_written = self.writer.write(buf)?;
        self.position += bytes_written as u64;

        if self.sync_writes {
            self.writer.flush()?;
        }

        Ok(bytes_written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| PantryError::storage(format!("Failed to flush: {e}")))?;

        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| PantryError::storage(format!("Failed to sync: {e}")))?;

        Ok(())
    }

    fn position(&self) -> u64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;
    use crate::storage::traits::{read_all, write_atomic};

    fn create_test_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), StorageConfig::default()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_file_storage_creation() {
        let (temp_dir, storage) = create_test_storage();
        assert_eq!(storage.directory(), temp_dir.path());
        assert!(!storage.file_exists("missing.json"));
    }

    #[test]
    fn test_write_and_read() {
        let (_temp_dir, storage) = create_test_storage();

        let mut output = storage.create_output("test.txt").unwrap();
        output.write_all(b"Hello, World!").unwrap();
        assert_eq!(output.position(), 13);
        output.flush_and_sync().unwrap();
        drop(output);

        assert!(storage.file_exists("test.txt"));
        assert_eq!(storage.file_size("test.txt").unwrap(), 13);
        assert_eq!(read_all(&storage, "test.txt").unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_append() {
        let (_temp_dir, storage) = create_test_storage();

        for line in ["one\n", "two\n"] {
            let mut output = storage.create_output_append("log.jsonl").unwrap();
            output.write_all(line.as_bytes()).unwrap();
            output.flush_and_sync().unwrap();
        }

        assert_eq!(read_all(&storage, "log.jsonl").unwrap(), b"one\ntwo\n");
    }

    #[test]
    fn test_missing_file_is_classified() {
        let (_temp_dir, storage) = create_test_storage();
        let err = storage.open_input("nope.bin").unwrap_err();
        assert!(err.to_string().contains("File not found: nope.bin"));
    }

    #[test]
    fn test_write_atomic_replaces_content_and_cleans_up() {
        let (temp_dir, storage) = create_test_storage();

        write_atomic(&storage, "model.bin", b"first").unwrap();
        write_atomic(&storage, "model.bin", b"second").unwrap();

        assert_eq!(read_all(&storage, "model.bin").unwrap(), b"second");
        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_temp_output_never_reuses_existing_file() {
        let (_temp_dir, storage) = create_test_storage();
        let mut stale = storage.create_output(".model.bin_0.tmp").unwrap();
        stale.write_all(b"other writer").unwrap();
        stale.flush_and_sync().unwrap();
        drop(stale);

        let (name, output) = storage.create_temp_output("model.bin").unwrap();
        drop(output);
        assert_eq!(name, ".model.bin_1.tmp");
        assert_eq!(
            read_all(&storage, ".model.bin_0.tmp").unwrap(),
            b"other writer"
        );
    }

    #[test]
    fn test_concurrent_temp_outputs_get_distinct_names() {
        let (_temp_dir, storage) = create_test_storage();

        let mut names: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| storage.create_temp_output("model.bin").unwrap().0))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_open_does_not_create_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("not_there");
        let storage = FileStorage::open(&missing, StorageConfig::default());

        assert!(!storage.file_exists("model.bin"));
        assert!(!missing.exists());
        assert!(storage.location("model.bin").ends_with("model.bin"));
    }
}
