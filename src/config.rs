/// Number of full header reads the consumer performs before it continues into the body,
/// as done by the Avro object container reader.
pub const DEFAULT_HEADER_READS: u32 = 2;

/// Tunes how a [`SeekEmulatingReader`](crate::SeekEmulatingReader) recognises the end
/// of the header handshake.
///
/// ```rust
/// use seek_emulating_reader::ReaderConfig;
///
/// let config = ReaderConfig::new().with_header_reads(3);
/// assert_eq!(config.header_reads(), 3);
/// assert_eq!(ReaderConfig::default().header_reads(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    header_reads: u32,
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many times the consumer reads the complete header. The reader switches
    /// to the underlying stream once the last of these reads has been served.
    pub fn with_header_reads(mut self, header_reads: u32) -> Self {
        self.header_reads = header_reads;
        self
    }

    pub fn header_reads(&self) -> u32 {
        self.header_reads
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            header_reads: DEFAULT_HEADER_READS,
        }
    }
}
