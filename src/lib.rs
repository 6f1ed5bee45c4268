//! This crate provides a [`SeekEmulatingReader`], which turns a forward-only
//! [`Read`](std::io::Read) into a [`Read`](std::io::Read)+[`Seek`](std::io::Seek) that is good enough for
//! container file readers such as the one of Apache Avro. Those readers want a seekable stream,
//! but only ever use it in a very narrow way:
//!
//!  - read the magic header, rewind to the start and read the header again
//!  - read the body sequentially
//!  - probe one byte ahead to detect the end of the stream, and step back by one byte if there is more
//!
//! The header is buffered when the reader is opened, and the most recent single byte read is kept.
//! Nothing else is buffered, and every access outside of this pattern fails with a [`ReplayError`].
//!
//! # Reading the header twice
//! ```rust
//! use std::io::{Cursor, SeekFrom};
//! use seek_emulating_reader::{KnownLength, SeekEmulatingReader, AVRO_MAGIC, MAGIC_LEN};
//! # let mut data = AVRO_MAGIC.to_vec();
//! # data.extend(0..100u8);
//! let source = KnownLength::new(Cursor::new(data), 104); // behaves like a pipe
//! let mut reader = SeekEmulatingReader::open(source).unwrap();
//!
//! let mut header = [0; MAGIC_LEN];
//! assert_eq!(reader.read(&mut header).unwrap(), MAGIC_LEN);
//! assert_eq!(reader.position(), 4);
//!
//! assert_eq!(reader.seek(SeekFrom::Start(0)).unwrap(), 0);
//! assert_eq!(reader.read(&mut header).unwrap(), MAGIC_LEN);
//! assert_eq!(header, AVRO_MAGIC);
//!
//! /* from now on, data comes from the body */
//! let mut body = [0; 4];
//! reader.read(&mut body).unwrap();
//! assert_eq!(body, [0, 1, 2, 3]);
//! assert_eq!(reader.position(), 8);
//! ```
//!
//! # Stepping back after probing for the end of the stream
//! ```rust
//! # use std::io::{Cursor, SeekFrom};
//! # use seek_emulating_reader::{KnownLength, SeekEmulatingReader, AVRO_MAGIC, MAGIC_LEN};
//! # let mut data = AVRO_MAGIC.to_vec();
//! # data.extend(0..100u8);
//! # let source = KnownLength::new(Cursor::new(data), 104);
//! # let mut reader = SeekEmulatingReader::open(source).unwrap();
//! # let mut header = [0; MAGIC_LEN];
//! # reader.read(&mut header).unwrap();
//! # reader.seek(SeekFrom::Start(0)).unwrap();
//! # reader.read(&mut header).unwrap();
//! let position = reader.position();
//! assert_eq!(reader.read_byte().unwrap(), Some(0));
//!
//! /* not at the end, so go back by one byte */
//! reader.set_position(position).unwrap();
//! assert_eq!(reader.position(), position);
//! assert_eq!(reader.read_byte().unwrap(), Some(0));
//! assert_eq!(reader.position(), position + 1);
//! ```
//!
//! # Everything else is rejected
//! ```rust
//! # use std::io::{Cursor, SeekFrom};
//! # use seek_emulating_reader::{KnownLength, ReplayError, SeekEmulatingReader, AVRO_MAGIC, MAGIC_LEN};
//! # let mut data = AVRO_MAGIC.to_vec();
//! # data.extend(0..100u8);
//! # let source = KnownLength::new(Cursor::new(data), 104);
//! let mut reader = SeekEmulatingReader::open(source).unwrap();
//! assert!(matches!(reader.seek(SeekFrom::Start(2)), Err(ReplayError::BadOffset(2))));
//! assert!(matches!(reader.read_byte(), Err(ReplayError::InvalidSequence(_))));
//!
//! # let mut header = [0; MAGIC_LEN];
//! # reader.read(&mut header).unwrap();
//! # reader.seek(SeekFrom::Start(0)).unwrap();
//! # reader.read(&mut header).unwrap();
//! reader.read_byte().unwrap();
//! assert!(matches!(reader.set_position(0), Err(ReplayError::InvalidDecrement { .. })));
//! assert!(matches!(reader.seek(SeekFrom::Start(0)), Err(ReplayError::Unseekable)));
//! ```
mod config;
mod error;
mod reader;
mod source;

pub use crate::config::{ReaderConfig, DEFAULT_HEADER_READS};
pub use crate::error::{ReplayError, Result};
pub use crate::reader::SeekEmulatingReader;
pub use crate::source::{ForwardSource, KnownLength};

/// Length of the magic marker at the start of an Avro object container file.
pub const MAGIC_LEN: usize = 4;

/// The magic marker of an Avro object container file.
pub const AVRO_MAGIC: [u8; MAGIC_LEN] = *b"Obj\x01";
