//! Shared random-access source trait and implementations
//!
//! A source is read at explicit absolute positions and is safe to share
//! between threads. Implementations never expose a cursor of their own, so
//! any number of independent readers can use the same source at once.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Trait for sources that support positioned reads and skips
pub trait SharedSource: Send + Sync {
    /// Total length of the source in bytes
    fn length(&self) -> io::Result<u64>;

    /// Read into `buf` starting at the absolute `position`
    ///
    /// Returns `Ok(None)` when no data exists at `position` (end of source).
    /// Short reads are allowed.
    fn read_from(&self, position: u64, buf: &mut [u8]) -> io::Result<Option<usize>>;

    /// Skip up to `count` bytes starting at `position`, returning how many
    /// bytes were actually skipped
    ///
    /// The default implementation clips to the end of the source and does no I/O.
    fn skip_from(&self, position: u64, count: u64) -> io::Result<u64> {
        let length = self.length()?;
        Ok(count.min(length.saturating_sub(position)))
    }
}

impl<T: SharedSource + ?Sized> SharedSource for &T {
    fn length(&self) -> io::Result<u64> {
        (**self).length()
    }

    fn read_from(&self, position: u64, buf: &mut [u8]) -> io::Result<Option<usize>> {
        (**self).read_from(position, buf)
    }

    fn skip_from(&self, position: u64, count: u64) -> io::Result<u64> {
        (**self).skip_from(position, count)
    }
}

impl<T: SharedSource + ?Sized> SharedSource for Arc<T> {
    fn length(&self) -> io::Result<u64> {
        (**self).length()
    }

    fn read_from(&self, position: u64, buf: &mut [u8]) -> io::Result<Option<usize>> {
        (**self).read_from(position, buf)
    }

    fn skip_from(&self, position: u64, count: u64) -> io::Result<u64> {
        (**self).skip_from(position, count)
    }
}

/// Source backed by any seekable reader, serialized through a mutex
pub struct SynchronizedSource<R> {
    inner: Mutex<R>,
    length: u64,
}

impl SynchronizedSource<File> {
    /// Open a file as a shared source
    ///
    /// The file is not buffered: every positioned read seeks first, which
    /// would discard a read buffer anyway.
    pub fn open(path: &Path) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        log::debug!("Opened {} as shared source", path.display());
        Self::new(file)
    }
}

impl<R: Read + Seek + Send> SynchronizedSource<R> {
    /// Wrap a seekable reader; its length is measured once here
    pub fn new(mut reader: R) -> Result<Self, io::Error> {
        let length = reader.seek(SeekFrom::End(0))?;
        Ok(Self {
            inner: Mutex::new(reader),
            length,
        })
    }

    /// Give back the wrapped reader
    pub fn into_inner(self) -> Result<R, io::Error> {
        self.inner.into_inner().map_err(|_| poisoned())
    }
}

fn poisoned() -> io::Error {
    io::Error::other("source lock poisoned")
}

impl<R: Read + Seek + Send> SharedSource for SynchronizedSource<R> {
    fn length(&self) -> io::Result<u64> {
        Ok(self.length)
    }

    fn read_from(&self, position: u64, buf: &mut [u8]) -> io::Result<Option<usize>> {
        if position >= self.length {
            return Ok(None);
        }
        if buf.is_empty() {
            return Ok(Some(0));
        }

        let mut reader = self.inner.lock().map_err(|_| poisoned())?;
        reader.seek(SeekFrom::Start(position))?;
        match reader.read(buf)? {
            0 => Ok(None),
            n => Ok(Some(n)),
        }
    }
}

/// In-memory source
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for MemorySource {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for MemorySource {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl SharedSource for MemorySource {
    fn length(&self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn read_from(&self, position: u64, buf: &mut [u8]) -> io::Result<Option<usize>> {
        let start = match usize::try_from(position) {
            Ok(start) if start < self.data.len() => start,
            _ => return Ok(None),
        };
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn create_test_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_memory_source_read() {
        let source = MemorySource::from(&b"Hello, World!"[..]);
        assert_eq!(source.length().unwrap(), 13);

        let mut buf = [0u8; 5];
        assert_eq!(source.read_from(7, &mut buf).unwrap(), Some(5));
        assert_eq!(&buf, b"World");
    }

    #[test]
    fn test_memory_source_short_read_at_end() {
        let source = MemorySource::from(&b"Hello, World!"[..]);
        let mut buf = [0u8; 10];
        assert_eq!(source.read_from(10, &mut buf).unwrap(), Some(3));
        assert_eq!(&buf[..3], b"ld!");
    }

    #[test]
    fn test_memory_source_end_of_source() {
        let source = MemorySource::from(&b"abc"[..]);
        let mut buf = [0u8; 4];
        assert_eq!(source.read_from(3, &mut buf).unwrap(), None);
        assert_eq!(source.read_from(u64::MAX, &mut buf).unwrap(), None);
    }

    #[test]
    fn test_default_skip_clips_to_length() {
        let source = MemorySource::new(vec![0u8; 50]);
        assert_eq!(source.skip_from(0, 10).unwrap(), 10);
        assert_eq!(source.skip_from(45, 10).unwrap(), 5);
        assert_eq!(source.skip_from(60, 10).unwrap(), 0);
    }

    #[test]
    fn test_synchronized_source_over_cursor() {
        let source = SynchronizedSource::new(Cursor::new(b"0123456789".to_vec())).unwrap();
        assert_eq!(source.length().unwrap(), 10);

        let mut buf = [0u8; 4];
        assert_eq!(source.read_from(6, &mut buf).unwrap(), Some(4));
        assert_eq!(&buf, b"6789");
        assert_eq!(source.read_from(2, &mut buf).unwrap(), Some(4));
        assert_eq!(&buf, b"2345");
        assert_eq!(source.read_from(10, &mut buf).unwrap(), None);
    }

    #[test]
    fn test_synchronized_source_open_file() {
        let file = create_test_file(b"Hello, World!");
        let source = SynchronizedSource::open(file.path()).unwrap();
        assert_eq!(source.length().unwrap(), 13);

        let mut buf = [0u8; 5];
        assert_eq!(source.read_from(0, &mut buf).unwrap(), Some(5));
        assert_eq!(&buf, b"Hello");
    }

    #[test]
    fn test_open_file_reads_out_of_order() {
        let file = create_test_file(b"0123456789abcdef");
        let source: SynchronizedSource<File> = SynchronizedSource::open(file.path()).unwrap();

        let mut buf = [0u8; 3];
        for (position, expected) in [(13, b"def"), (0, b"012"), (7, b"789"), (1, b"123")] {
            assert_eq!(source.read_from(position, &mut buf).unwrap(), Some(3));
            assert_eq!(&buf, expected);
        }

        let mut inner = source.into_inner().unwrap();
        assert_eq!(inner.stream_position().unwrap(), 4);
    }

    #[test]
    fn test_poisoned_lock_surfaces_as_io_error() {
        let source = SynchronizedSource::new(Cursor::new(vec![0u8; 8])).unwrap();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = source.inner.lock().unwrap();
            panic!("poison the lock");
        }));

        let mut buf = [0u8; 2];
        let err = source.read_from(0, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(err.to_string(), "source lock poisoned");
    }

    #[test]
    fn test_open_missing_file() {
        let result = SynchronizedSource::open(Path::new("/nonexistent/source.bin"));
        assert!(result.is_err());
    }

    #[test]
    fn test_into_inner_returns_reader() {
        let source = SynchronizedSource::new(Cursor::new(vec![1u8, 2, 3])).unwrap();
        let cursor = source.into_inner().unwrap();
        assert_eq!(cursor.into_inner(), vec![1u8, 2, 3]);
    }

    #[test]
    fn test_arc_source_delegates() {
        let source: Arc<dyn SharedSource> = Arc::new(MemorySource::from(&b"xyz"[..]));
        assert_eq!(source.length().unwrap(), 3);
        assert_eq!(source.skip_from(1, 5).unwrap(), 2);
    }
}
