//! Plain and gzip text files behind one reader and one writer type.
//!
//! Compression is decided by the path alone: a `.gz` extension means gzip,
//! anything else is read and written as-is.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// True if `path` names a gzip-compressed file.
pub fn is_gzip<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("gz"))
}

/// Open `path` for buffered reading, decompressing on the fly for `.gz` files.
pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A text output file, compressed or not.
///
/// Call [`TextSink::finish`] when done: dropping a gzip sink swallows any
/// error raised while writing the trailer.
pub enum TextSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl TextSink {
    /// Create (or truncate) `path`, compressing if it ends in `.gz`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = BufWriter::new(File::create(path)?);
        if is_gzip(path) {
            Ok(Self::Gzip(GzEncoder::new(file, Compression::default())))
        } else {
            Ok(Self::Plain(file))
        }
    }

    /// Flush buffered data and, for gzip, write the stream trailer.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::Plain(mut w) => w.flush(),
            Self::Gzip(enc) => enc.finish()?.flush(),
        }
    }
}

impl Write for TextSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_is_gzip() {
        assert!(is_gzip("labels.gz"));
        assert!(is_gzip("dir/x_ks_range.labels.GZ"));
        assert!(!is_gzip("labels.txt"));
        assert!(!is_gzip("gz"));
        assert!(!is_gzip("labels.tgz"));
    }

    #[test]
    fn test_gzip_sink_is_compressed_and_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt.gz");

        let mut sink = TextSink::create(&path).unwrap();
        writeln!(sink, "0").unwrap();
        writeln!(sink, "2").unwrap();
        sink.finish().unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        let mut text = String::new();
        open_reader(&path).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "0\n2\n");
    }

    #[test]
    fn test_plain_sink_writes_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        let mut sink = TextSink::create(&path).unwrap();
        sink.write_all(b"seed: 1\n").unwrap();
        sink.finish().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "seed: 1\n");
    }

    #[test]
    fn test_open_reader_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = open_reader(dir.path().join("nope.txt")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
