//! The forward-only side of a [`SeekEmulatingReader`](crate::SeekEmulatingReader).
//!
//! A source only has to be [`Read`]. In addition, it must know its total length, which
//! consumers of container files ask for even though they never seek to the end.
use std::fs::File;
use std::io::{self, Cursor, Read};

/// A byte stream which can only be read front to back.
pub trait ForwardSource: Read {
    /// Total number of bytes in the stream, including the bytes already consumed.
    fn length(&self) -> io::Result<u64>;

    fn can_read(&self) -> bool {
        true
    }
}

impl ForwardSource for File {
    fn length(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl<T> ForwardSource for Cursor<T>
where
    T: AsRef<[u8]>,
{
    fn length(&self) -> io::Result<u64> {
        Ok(self.get_ref().as_ref().len() as u64)
    }
}

impl<S> ForwardSource for &mut S
where
    S: ForwardSource + ?Sized,
{
    fn length(&self) -> io::Result<u64> {
        (**self).length()
    }

    fn can_read(&self) -> bool {
        (**self).can_read()
    }
}

impl<S> ForwardSource for Box<S>
where
    S: ForwardSource + ?Sized,
{
    fn length(&self) -> io::Result<u64> {
        (**self).length()
    }

    fn can_read(&self) -> bool {
        (**self).can_read()
    }
}

/// Pairs a plain [`Read`] (stdin, a pipe, a socket) with a length the caller learned
/// elsewhere, e.g. from a `Content-Length` header or a job description.
#[derive(Debug)]
pub struct KnownLength<R> {
    /// Wrapped reader
    pub reader: R,
    length: u64,
}

impl<R> KnownLength<R>
where
    R: Read,
{
    pub fn new(reader: R, length: u64) -> Self {
        Self { reader, length }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R> Read for KnownLength<R>
where
    R: Read,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R> ForwardSource for KnownLength<R>
where
    R: Read,
{
    fn length(&self) -> io::Result<u64> {
        Ok(self.length)
    }
}
