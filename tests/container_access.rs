use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use pretty_assertions::assert_eq;
use seek_emulating_reader::{
    ForwardSource, KnownLength, ReplayError, SeekEmulatingReader, AVRO_MAGIC, MAGIC_LEN,
};
use tempdir::TempDir;

fn initialize() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Magic marker followed by blocks of `[len, payload...]`.
fn container(blocks: &[&[u8]]) -> Vec<u8> {
    let mut data = AVRO_MAGIC.to_vec();
    for block in blocks {
        data.push(block.len() as u8);
        data.extend_from_slice(block);
    }
    data
}

/// Accesses the stream the way a container file reader does: it validates the magic,
/// rewinds and reads it again while initializing, then reads length-prefixed blocks and
/// probes one byte ahead after each block to see whether the stream has ended.
fn read_blocks<S>(stream: &mut SeekEmulatingReader<S>) -> io::Result<Vec<Vec<u8>>>
where
    S: ForwardSource,
{
    let mut magic = [0; MAGIC_LEN];
    stream.read_exact(&mut magic)?;
    assert_eq!(magic, AVRO_MAGIC);
    stream.rewind()?;
    stream.read_exact(&mut magic)?;

    let mut blocks = Vec::new();
    loop {
        let before = stream.stream_position()?;
        let len = match stream.read_byte()? {
            None => break,
            Some(len) => {
                stream.set_position(before)?;
                stream.read_byte()?;
                len
            }
        };
        let mut block = vec![0; len as usize];
        stream.read_exact(&mut block)?;
        blocks.push(block);
    }
    Ok(blocks)
}

#[test]
fn non_seekable_source() {
    initialize();
    let data = container(&[b"alpha", b"", b"gamma ray"]);
    let length = data.len() as u64;
    let mut source = KnownLength::new(&data[..], length);

    let mut reader = SeekEmulatingReader::open(&mut source).unwrap();
    let blocks = read_blocks(&mut reader).unwrap();
    assert_eq!(
        blocks,
        vec![b"alpha".to_vec(), Vec::new(), b"gamma ray".to_vec()]
    );
    assert_eq!(reader.position(), length);
    assert_eq!(reader.length().unwrap(), length);
}

#[test]
fn file_source() {
    initialize();
    let dir = TempDir::new("container_access").unwrap();
    let path = dir.path().join("data.avro");
    let data = container(&[b"one", b"two", b"three"]);
    File::create(&path).unwrap().write_all(&data).unwrap();

    let file = File::open(&path).unwrap();
    let mut reader = SeekEmulatingReader::open(file).unwrap();
    assert_eq!(reader.length().unwrap(), data.len() as u64);

    let blocks = read_blocks(&mut reader).unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[2], b"three".to_vec());
}

#[test]
fn empty_file_is_malformed() {
    initialize();
    let dir = TempDir::new("container_access").unwrap();
    let path = dir.path().join("empty.avro");
    File::create(&path).unwrap();

    let file = File::open(&path).unwrap();
    let err = SeekEmulatingReader::open(file).unwrap_err();
    assert!(matches!(
        err,
        ReplayError::MalformedHeader { expected: MAGIC_LEN, .. }
    ));
}

#[test]
fn magic_with_hundred_body_bytes() {
    initialize();
    let mut data = vec![0x4f, 0x62, 0x6a, 0x01];
    data.extend((0..100u8).map(|b| b.wrapping_mul(7)));
    let body = data[MAGIC_LEN..].to_vec();
    let mut reader =
        SeekEmulatingReader::open(KnownLength::new(Cursor::new(data), 104)).unwrap();

    let mut buffer = [0; 4];
    assert_eq!(reader.read(&mut buffer).unwrap(), 4);
    assert_eq!(buffer, [0x4f, 0x62, 0x6a, 0x01]);
    assert_eq!(reader.position(), 4);

    assert_eq!(reader.seek(SeekFrom::Start(0)).unwrap(), 0);
    assert_eq!(reader.position(), 0);

    assert_eq!(reader.read(&mut buffer).unwrap(), 4);
    assert_eq!(buffer, [0x4f, 0x62, 0x6a, 0x01]);
    assert_eq!(reader.position(), 4);

    assert_eq!(reader.read(&mut buffer).unwrap(), 4);
    assert_eq!(&buffer[..], &body[..4]);
    assert_eq!(reader.position(), 8);

    assert_eq!(reader.read_byte().unwrap(), Some(body[4]));
    assert_eq!(reader.position(), 9);

    reader.set_position(8).unwrap();
    assert_eq!(reader.position(), 8);

    assert_eq!(reader.read_byte().unwrap(), Some(body[4]));
    assert_eq!(reader.position(), 9);

    assert!(matches!(
        reader.seek(SeekFrom::Start(0)),
        Err(ReplayError::Unseekable)
    ));
    assert_eq!(reader.length().unwrap(), 104);
}

#[test]
fn io_error_kinds_for_misuse() {
    initialize();
    let data = container(&[b"x"]);
    let length = data.len() as u64;
    let mut reader = SeekEmulatingReader::open(KnownLength::new(&data[..], length)).unwrap();

    let mut short = [0; 2];
    let err = Read::read(&mut reader, &mut short).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Other);

    let err = Seek::seek(&mut reader, SeekFrom::Start(3)).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    let inner = err.into_inner().unwrap();
    assert!(matches!(
        inner.downcast_ref::<ReplayError>(),
        Some(ReplayError::BadOffset(3))
    ));
}
