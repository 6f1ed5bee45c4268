use std::fmt;
use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom};
use std::mem;

use crate::config::ReaderConfig;
use crate::error::{ReplayError, Result};
use crate::source::ForwardSource;
use crate::MAGIC_LEN;

/// Which source satisfies the next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    /// Reads are served from the header replica. `reads` counts the complete header
    /// reads served so far.
    ReadingHeader { reads: u32 },

    /// Reads go to the wrapped stream. `last_byte` holds the byte of the most recent
    /// [`SeekEmulatingReader::read_byte`] call, as long as nothing else has been read since.
    ReadingBody { last_byte: Option<u8> },

    /// The position has been decremented; `byte` must be handed out before the
    /// wrapped stream is touched again.
    ReplayingLastByte { byte: u8 },
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadMode::ReadingHeader { .. } => write!(f, "header"),
            ReadMode::ReadingBody { .. } => write!(f, "body"),
            ReadMode::ReplayingLastByte { .. } => write!(f, "last byte"),
        }
    }
}

/// Wraps a forward-only [`ForwardSource`] and offers it as [`Read`] + [`Seek`] to a
/// consumer which reads the first `N` bytes twice and afterwards only ever rewinds by a
/// single byte after a [`read_byte`](SeekEmulatingReader::read_byte).
///
/// The first `N` bytes are copied into an internal replica when the reader is opened.
/// Every access outside of the supported pattern fails with a [`ReplayError`], and
/// leaves the reader untouched.
///
/// Passing `&mut source` keeps the source owned by the caller; the reader never closes it.
#[derive(Debug)]
pub struct SeekEmulatingReader<R, const N: usize = MAGIC_LEN>
where
    R: ForwardSource,
{
    reader: R,
    header: Cursor<[u8; N]>,
    expected_header_reads: u32,
    mode: ReadMode,

    /// number of bytes taken from `reader`, including the header
    consumed: u64,
}

impl<R> SeekEmulatingReader<R>
where
    R: ForwardSource,
{
    /// Opens a reader for a stream starting with a [`MAGIC_LEN`] byte header which is
    /// read twice by the consumer.
    pub fn open(reader: R) -> Result<Self> {
        Self::new(reader, ReaderConfig::default())
    }

    pub fn with_config(reader: R, config: ReaderConfig) -> Result<Self> {
        Self::new(reader, config)
    }
}

impl<R, const N: usize> SeekEmulatingReader<R, N>
where
    R: ForwardSource,
{
    /// Creates a new reader for a header of `N` bytes, consuming exactly these `N` bytes
    /// from `reader`.
    ///
    ///  - `reader` - forward-only stream which has to be wrapped
    ///  - `config` - describes the header handshake of the consumer
    pub fn new(mut reader: R, config: ReaderConfig) -> Result<Self> {
        if N == 0 {
            return Err(ReplayError::InvalidInput("header length must not be zero"));
        }
        let expected_header_reads = config.header_reads();
        if expected_header_reads == 0 {
            return Err(ReplayError::InvalidInput(
                "header must be read at least once",
            ));
        }

        let header = Self::initialize_header(&mut reader)?;
        log::debug!(
            "captured {} header bytes, switching to body after {} header reads",
            N,
            expected_header_reads
        );

        Ok(Self {
            reader,
            header: Cursor::new(header),
            expected_header_reads,
            mode: ReadMode::ReadingHeader { reads: 0 },
            consumed: N as u64,
        })
    }

    fn initialize_header(reader: &mut R) -> Result<[u8; N]> {
        let mut buffer = [0; N];
        let mut filled = 0;
        while filled < N {
            match reader.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(bytes) => filled += bytes,
                Err(why) if why.kind() == ErrorKind::Interrupted => {}
                Err(why) => return Err(why.into()),
            }
        }
        if filled < N {
            return Err(ReplayError::MalformedHeader {
                expected: N,
                found: buffer[..filled].to_vec(),
            });
        }
        Ok(buffer)
    }

    /// The header bytes captured when the reader was opened.
    pub fn header(&self) -> &[u8; N] {
        self.header.get_ref()
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Releases the header replica and returns the wrapped stream, positioned wherever
    /// the last read left it.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Fills `dst` from the header replica or the wrapped stream, depending on how far
    /// the consumer has come.
    ///
    /// While the header is being read, `dst` must be exactly `N` bytes long and the
    /// header must have been rewound with [`seek`](Self::seek) since the last read.
    /// After a rewind, only [`read_byte`](Self::read_byte) is accepted.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        match self.mode {
            ReadMode::ReadingHeader { reads } => self.read_header(dst, reads),
            ReadMode::ReadingBody { .. } => self.read_body(dst),
            ReadMode::ReplayingLastByte { .. } => Err(ReplayError::InvalidSequence(
                "the rewound byte has to be read with read_byte",
            )),
        }
    }

    fn read_header(&mut self, dst: &mut [u8], reads: u32) -> Result<usize> {
        if self.header.position() != 0 {
            return Err(ReplayError::InvalidSequence(
                "can only read the header from the beginning",
            ));
        }
        if dst.len() != N {
            return Err(ReplayError::InvalidSequence(
                "can only read the entire header",
            ));
        }

        let bytes = self.header.read(dst)?;
        let reads = reads + 1;
        log::trace!("served header read {} of {}", reads, self.expected_header_reads);

        if reads == self.expected_header_reads {
            self.enter(ReadMode::ReadingBody { last_byte: None });
        } else {
            self.mode = ReadMode::ReadingHeader { reads };
        }
        Ok(bytes)
    }

    fn read_body(&mut self, dst: &mut [u8]) -> Result<usize> {
        let bytes = self.reader.read(dst)?;
        self.consumed += bytes as u64;
        self.mode = ReadMode::ReadingBody { last_byte: None };
        log::trace!("read {} bytes from body, now at {}", bytes, self.consumed);
        Ok(bytes)
    }

    /// Reads a single byte of the body and remembers it, so that the position can be
    /// decremented once afterwards. Returns `None` at the end of the stream.
    ///
    /// After a rewind the remembered byte is returned without touching the wrapped stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.mode {
            ReadMode::ReadingHeader { .. } => Err(ReplayError::InvalidSequence(
                "single byte reads of the header are not supported",
            )),
            ReadMode::ReplayingLastByte { byte } => {
                self.enter(ReadMode::ReadingBody { last_byte: None });
                Ok(Some(byte))
            }
            ReadMode::ReadingBody { .. } => {
                let mut buffer = [0; 1];
                if self.reader.read(&mut buffer)? == 0 {
                    log::trace!("end of stream reached at {}", self.consumed);
                    self.mode = ReadMode::ReadingBody { last_byte: None };
                    return Ok(None);
                }
                self.consumed += 1;
                self.mode = ReadMode::ReadingBody {
                    last_byte: Some(buffer[0]),
                };
                Ok(Some(buffer[0]))
            }
        }
    }

    /// The position as seen by the consumer.
    pub fn position(&self) -> u64 {
        match self.mode {
            ReadMode::ReadingHeader { .. } => self.header.position(),
            ReadMode::ReadingBody { .. } => self.consumed,
            ReadMode::ReplayingLastByte { .. } => self.consumed - 1,
        }
    }

    /// Moves the position back by exactly one byte, right after a
    /// [`read_byte`](Self::read_byte). Any other position is rejected.
    pub fn set_position(&mut self, position: u64) -> Result<()> {
        let byte = match self.mode {
            ReadMode::ReadingBody {
                last_byte: Some(byte),
            } => byte,
            ReadMode::ReplayingLastByte { .. } => {
                self.check_decrement(position)?;
                return Err(ReplayError::InvalidSequence(
                    "the last byte has already been rewound",
                ));
            }
            _ => return Err(ReplayError::NoLastByte),
        };

        self.check_decrement(position)?;
        self.enter(ReadMode::ReplayingLastByte { byte });
        Ok(())
    }

    fn check_decrement(&self, requested: u64) -> Result<()> {
        // a byte has been read from the body, so `consumed` is at least N + 1
        let expected = self.consumed - 1;
        if requested != expected {
            return Err(ReplayError::InvalidDecrement {
                requested,
                expected,
            });
        }
        Ok(())
    }

    /// Rewinds the header. Only `SeekFrom::Start(0)` is supported, and only until the
    /// consumer has started to read the body.
    pub fn seek(&mut self, seek_from: SeekFrom) -> Result<u64> {
        if !matches!(self.mode, ReadMode::ReadingHeader { .. }) {
            return Err(ReplayError::Unseekable);
        }

        match seek_from {
            SeekFrom::Start(0) => {
                self.header.set_position(0);
                Ok(0)
            }
            SeekFrom::Start(offset) => Err(ReplayError::BadOffset(
                i64::try_from(offset).unwrap_or(i64::MAX),
            )),
            SeekFrom::Current(0) | SeekFrom::End(0) => Err(ReplayError::BadOrigin),
            SeekFrom::Current(offset) | SeekFrom::End(offset) => {
                Err(ReplayError::BadOffset(offset))
            }
        }
    }

    /// Total length of the wrapped stream, including the header.
    pub fn length(&self) -> Result<u64> {
        Ok(self.reader.length()?)
    }

    pub fn can_read(&self) -> bool {
        self.reader.can_read()
    }

    /// Always `true`, because rewinding the header is always possible.
    pub fn can_seek(&self) -> bool {
        true
    }

    pub fn can_write(&self) -> bool {
        false
    }

    pub fn write(&mut self, _src: &[u8]) -> Result<usize> {
        Err(ReplayError::Unsupported("write"))
    }

    pub fn flush(&mut self) -> Result<()> {
        Err(ReplayError::Unsupported("flush"))
    }

    pub fn set_len(&mut self, _length: u64) -> Result<()> {
        Err(ReplayError::Unsupported("set_len"))
    }

    fn enter(&mut self, mode: ReadMode) {
        let previous = mem::replace(&mut self.mode, mode);
        if mem::discriminant(&previous) != mem::discriminant(&mode) {
            log::debug!(
                "switched from {} to {} at position {}",
                previous,
                mode,
                self.position()
            );
        }
    }
}

impl<R, const N: usize> Read for SeekEmulatingReader<R, N>
where
    R: ForwardSource,
{
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        Ok(SeekEmulatingReader::read(self, dst)?)
    }
}

impl<R, const N: usize> Seek for SeekEmulatingReader<R, N>
where
    R: ForwardSource,
{
    fn seek(&mut self, seek_from: SeekFrom) -> io::Result<u64> {
        Ok(SeekEmulatingReader::seek(self, seek_from)?)
    }

    // the default would issue SeekFrom::Current(0), which is not a supported seek
    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position())
    }
}
