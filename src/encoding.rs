//! Input opening, encoding detection and transcoding
//!
//! Every input file is decoded to UTF-8 before tokenization so that ASCII
//! letters are recognized in UTF-16 and legacy single-byte encodings too.

use crate::error::{Result, VocabError};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes sampled for encoding detection
const SAMPLE_SIZE: usize = 64 * 1024;

/// Read buffer for decoded input
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    /// Detected encoding name
    pub name: &'static str,
    /// Confidence level (0.0 - 1.0)
    pub confidence: f32,
    /// The encoding_rs Encoding reference
    pub encoding: &'static Encoding,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            confidence: 1.0,
            encoding: encoding_rs::UTF_8,
        }
    }
}

impl EncodingInfo {
    fn forced(encoding: &'static Encoding) -> Self {
        Self {
            name: encoding.name(),
            confidence: 1.0,
            encoding,
        }
    }
}

/// How input files are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Buffered reads through the file handle
    #[default]
    Buffered,
    /// Memory-mapped file contents
    Mmap,
}

/// Detect the encoding of a byte sample
///
/// `complete` is false when `sample` is only the head of a longer file, in
/// which case a multibyte sequence cut off at the end is not held against
/// UTF-8.
pub fn detect_encoding_bytes(sample: &[u8], complete: bool) -> EncodingInfo {
    if sample.is_empty() {
        return EncodingInfo::default();
    }

    // Check for BOM first
    if let Some(encoding) = detect_bom(sample) {
        return EncodingInfo::forced(encoding);
    }

    match std::str::from_utf8(sample) {
        Ok(_) => return EncodingInfo::default(),
        Err(e) if !complete && e.error_len().is_none() => return EncodingInfo::default(),
        Err(_) => {}
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, complete);
    let guess = detector.guess(None, true);

    if guess == encoding_rs::UTF_8 || may_consume_ascii(guess) {
        if guess != encoding_rs::UTF_8 {
            log::debug!("Not trusting a {} guess; decoding as UTF-8", guess.name());
        }
        return EncodingInfo {
            confidence: 0.5,
            ..EncodingInfo::default()
        };
    }

    EncodingInfo {
        name: guess.name(),
        confidence: 0.8,
        encoding: guess,
    }
}

/// Whether `encoding` has multibyte sequences whose trail bytes can be ASCII
///
/// Decoding with such an encoding can merge a stray high byte with the
/// letter after it, so a guessed one is never used for tokenization. They
/// remain available through an explicit `--encoding`.
pub fn may_consume_ascii(encoding: &'static Encoding) -> bool {
    [
        encoding_rs::SHIFT_JIS,
        encoding_rs::BIG5,
        encoding_rs::GBK,
        encoding_rs::GB18030,
        encoding_rs::ISO_2022_JP,
    ]
    .contains(&encoding)
}

/// Detect BOM (Byte Order Mark) at the start of content
fn detect_bom(content: &[u8]) -> Option<&'static Encoding> {
    if content.len() >= 3 && content[0..3] == [0xEF, 0xBB, 0xBF] {
        return Some(encoding_rs::UTF_8);
    }
    if content.len() >= 2 {
        if content[0..2] == [0xFE, 0xFF] {
            return Some(encoding_rs::UTF_16BE);
        }
        if content[0..2] == [0xFF, 0xFE] {
            return Some(encoding_rs::UTF_16LE);
        }
    }
    None
}

/// Resolve a user-supplied encoding label such as `latin1` or `utf-16le`
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| VocabError::InvalidArgument(format!("unknown encoding '{}'", label)))
}

/// An opened input file, not yet decoded
pub struct InputFile {
    /// Raw bytes of the file
    pub reader: Box<dyn Read>,
    /// File size in bytes
    pub size: u64,
    /// Encoding the contents will be decoded from
    pub encoding: EncodingInfo,
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFile")
            .field("size", &self.size)
            .field("encoding", &self.encoding.name)
            .finish()
    }
}

/// Open `path` for reading and determine its encoding
///
/// With `forced` set, detection is skipped. Failure to open the file is
/// reported as `FileOpen`; failures after that as `Read`.
pub fn open_input(
    path: &Path,
    mode: ReadMode,
    forced: Option<&'static Encoding>,
) -> Result<InputFile> {
    let read_error = |source: io::Error| VocabError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(|source| VocabError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata = file.metadata().map_err(read_error)?;
    if metadata.is_dir() {
        return Err(VocabError::FileOpen {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "is a directory"),
        });
    }
    let size = metadata.len();

    match mode {
        ReadMode::Buffered => {
            let encoding = match forced {
                Some(encoding) => EncodingInfo::forced(encoding),
                None => {
                    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
                    (&mut file)
                        .take(SAMPLE_SIZE as u64)
                        .read_to_end(&mut sample)
                        .map_err(read_error)?;
                    file.seek(SeekFrom::Start(0)).map_err(read_error)?;
                    detect_encoding_bytes(&sample, sample.len() as u64 >= size)
                }
            };

            Ok(InputFile {
                reader: Box::new(file),
                size,
                encoding,
            })
        }
        ReadMode::Mmap => {
            // Mapping a zero-length file fails on some platforms
            if size == 0 {
                return Ok(InputFile {
                    reader: Box::new(io::empty()),
                    size,
                    encoding: forced.map(EncodingInfo::forced).unwrap_or_default(),
                });
            }

            let mmap = unsafe { memmap2::Mmap::map(&file).map_err(read_error)? };
            let encoding = match forced {
                Some(encoding) => EncodingInfo::forced(encoding),
                None => {
                    let complete = mmap.len() <= SAMPLE_SIZE;
                    detect_encoding_bytes(&mmap[..mmap.len().min(SAMPLE_SIZE)], complete)
                }
            };

            Ok(InputFile {
                reader: Box::new(Cursor::new(mmap)),
                size,
                encoding,
            })
        }
    }
}

/// Wrap `reader` so that it yields UTF-8
///
/// A BOM in the stream overrides `encoding` and is stripped. Malformed
/// sequences become U+FFFD, which the tokenizer treats as a delimiter.
pub fn decoded_reader<R: Read>(
    reader: R,
    encoding: &'static Encoding,
) -> BufReader<DecodeReaderBytes<R, Vec<u8>>> {
    let decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .bom_override(true)
        .build(reader);
    BufReader::with_capacity(READ_BUFFER_SIZE, decoder)
}
