//! LZ4-frame payload compression.
//!
//! A compressed payload is a varint giving the uncompressed size, followed
//! by a single LZ4 frame holding exactly that many bytes. The size prefix
//! lets the decoder allocate its output once; the frame itself streams in
//! from the scatter-gather source chunk by chunk.
//!
//! Both directions hand allocation to the caller: a buffer factory takes
//! the required size and returns the region to write into, so callers can
//! place output directly in their network queues.

use crate::stream::{ChunkReader, ChunkSource};
use crate::varint::{read_varint, size_varint, varint_max, write_varint};
use crate::{WireError, WireResult};
use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use std::io::{Cursor, Read, Write};

/// Compression algorithm ids as carried in the wire header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Algorithm {
    /// No compression.
    None = 0x00,
    /// LZ4 frame format.
    Lz4 = 0x01,
}

impl TryFrom<u8> for Algorithm {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Algorithm::None),
            0x01 => Ok(Algorithm::Lz4),
            other => Err(WireError::UnknownAlgorithm(other)),
        }
    }
}

/// Whether a caller wants the compressed or the plain form of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compressed {
    /// Request the compressed form.
    On,
    /// Request the plain form.
    Off,
}

/// Worst-case compressed size of `n` payload bytes, excluding the varint
/// size prefix.
///
/// Upper bound over the frame header, one block header per 64 KiB block
/// with incompressible content, and the end mark and checksums.
pub fn compress_bound(n: usize) -> usize {
    n + (n >> 8) + 4 * (n / (64 * 1024) + 1) + 64
}

/// Compress `input` with `algorithm`.
///
/// The buffer factory is invoked exactly once with
/// `size_varint(n) + compress_bound(n)`; the varint original size and the
/// LZ4 frame are written into the returned region. Returns the total
/// bytes written.
pub fn compress<'a, F>(input: &[u8], algorithm: Algorithm, bf: F) -> WireResult<usize>
where
    F: FnOnce(usize) -> &'a mut [u8],
{
    match algorithm {
        Algorithm::Lz4 => lz4f_compress(input, bf),
        Algorithm::None => Err(WireError::Compression(
            "invalid compression algorithm".into(),
        )),
    }
}

/// Decompress `in_size` payload bytes pulled from `src`.
///
/// The buffer factory is invoked exactly once with the declared original
/// size, which must not exceed `max_out`. Returns the decompressed size.
pub fn decompress<'a, 'c, S, F>(
    src: &mut S,
    in_size: usize,
    max_out: usize,
    algorithm: Algorithm,
    bf: F,
) -> WireResult<usize>
where
    S: ChunkSource<'c>,
    F: FnOnce(usize) -> &'a mut [u8],
{
    match algorithm {
        Algorithm::Lz4 => lz4f_decompress(src, in_size, max_out, bf),
        Algorithm::None => Err(WireError::Compression(
            "invalid compression algorithm".into(),
        )),
    }
}

fn lz4f_compress<'a, F>(input: &[u8], bf: F) -> WireResult<usize>
where
    F: FnOnce(usize) -> &'a mut [u8],
{
    if input.len() > u32::MAX as usize {
        return Err(WireError::Compression("payload exceeds u32 range".into()));
    }

    let size_bytes = size_varint(input.len() as u32);
    let out = bf(size_bytes + compress_bound(input.len()));

    let written = write_varint(out, input.len() as u32);
    debug_assert_eq!(written, size_bytes);

    let mut encoder = FrameEncoder::new(Cursor::new(&mut out[size_bytes..]));
    encoder
        .write_all(input)
        .map_err(|e| WireError::Compression(e.to_string()))?;
    let cursor = encoder
        .finish()
        .map_err(|e| WireError::Compression(e.to_string()))?;

    Ok(size_bytes + cursor.position() as usize)
}

fn lz4f_decompress<'a, 'c, S, F>(
    src: &mut S,
    in_size: usize,
    max_out: usize,
    bf: F,
) -> WireResult<usize>
where
    S: ChunkSource<'c>,
    F: FnOnce(usize) -> &'a mut [u8],
{
    let (original_size, size_bytes) = read_original_size(src, in_size)?;
    let declared = original_size as usize;

    if declared > max_out {
        return Err(WireError::DecompressedTooLarge {
            size: declared,
            max: max_out,
        });
    }

    let out = bf(declared);
    debug_assert_eq!(out.len(), declared);

    let reader = ChunkReader::new(src, in_size - size_bytes);
    let mut decoder = FrameDecoder::new(reader);

    let mut filled = 0;
    while filled < declared {
        match decoder.read(&mut out[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(WireError::SizeMismatch {
                    declared,
                    actual: filled,
                })
            }
            Err(e) => return Err(WireError::Compression(e.to_string())),
        }
    }

    if filled < declared {
        return Err(WireError::SizeMismatch {
            declared,
            actual: filled,
        });
    }

    // The frame must not hold more than the prefix declared.
    let mut probe = [0u8; 1];
    if let Ok(n) = decoder.read(&mut probe) {
        if n > 0 {
            return Err(WireError::SizeMismatch {
                declared,
                actual: declared + n,
            });
        }
    }

    Ok(declared)
}

/// Peek the varint original-size prefix off the front of `src`.
///
/// Pulls whole chunks while gathering prefix bytes, then rewinds the
/// cursor so it rests on the first LZ4-frame byte. Returns the declared
/// size and the prefix length.
fn read_original_size<'c, S: ChunkSource<'c>>(
    src: &mut S,
    in_size: usize,
) -> WireResult<(u32, usize)> {
    let mut scratch = [0u8; varint_max::<u32>()];
    let want = scratch.len().min(in_size);
    let mut have = 0;
    let mut pulled = 0;

    while have < want {
        let Some(chunk) = src.next() else { break };
        let take = chunk.len().min(want - have);
        scratch[have..have + take].copy_from_slice(&chunk[..take]);
        have += take;
        pulled += chunk.len();
    }

    let (value, size_bytes) = read_varint(&scratch[..have])?;

    src.back_up(pulled);
    src.skip(size_bytes);

    Ok((value, size_bytes))
}
