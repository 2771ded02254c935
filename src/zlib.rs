//! The zlib container (RFC 1950) around a raw DEFLATE stream.
//!
//! A zlib stream is a two byte header, the DEFLATE data, then the Adler-32 of
//! the *uncompressed* data as a big-endian `u32`. The DEFLATE part is done by
//! [`flate2`]; this module owns the framing and the checksum so that both can
//! be checked byte for byte.
//!
//! ```
//! use nbtcodec::zlib;
//!
//! let packed = zlib::compress(b"hello hello hello", Default::default()).unwrap();
//! assert_eq!(&packed[..2], &[0x78, 0x9C]);
//! assert_eq!(zlib::decompress(&packed).unwrap(), b"hello hello hello");
//! ```
use std::io::{self, BufReader, Read, Write};

use flate2::Compression;
use log::debug;

use crate::error::{Error, Result};

const MOD_ADLER: u32 = 65521;

/// Bytes that can be summed before `b` could overflow a `u32`, so the
/// modulus only needs applying once per block.
const NMAX: usize = 5550;

/// Compression method 8 (deflate) with a 32K window.
const CMF: u8 = 0x78;

/// Preset dictionary flag in FLG.
const FDICT: u8 = 0x20;

/// Running Adler-32 checksum.
///
/// ```
/// use nbtcodec::zlib::Adler32;
///
/// let mut sum = Adler32::new();
/// sum.update(b"Wiki");
/// sum.update(b"pedia");
/// assert_eq!(sum.finish(), 300286872);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Adler32 {
    pub fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    pub fn update(&mut self, data: &[u8]) {
        for block in data.chunks(NMAX) {
            for &byte in block {
                self.a += u32::from(byte);
                self.b += self.a;
            }
            self.a %= MOD_ADLER;
            self.b %= MOD_ADLER;
        }
    }

    /// The checksum of everything passed to `update` so far.
    pub fn finish(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Adler-32 of a complete buffer.
pub fn adler32(data: &[u8]) -> u32 {
    let mut sum = Adler32::new();
    sum.update(data);
    sum.finish()
}

/// The zlib header for a compression level. FLEVEL is only a hint to
/// readers, it doesn't affect decoding.
pub fn header(level: Compression) -> [u8; 2] {
    let flevel: u8 = match level.level() {
        0 | 1 => 0,
        2..=5 => 1,
        6 => 2,
        _ => 3,
    };
    let flg = flevel << 6;
    let rem = ((u16::from(CMF) << 8) | u16::from(flg)) % 31;
    let fcheck = if rem == 0 { 0 } else { 31 - rem as u8 };
    [CMF, flg | fcheck]
}

/// Accept only deflate with a 32K window, correct check bits and no preset
/// dictionary.
pub fn check_header(header: [u8; 2]) -> Result<()> {
    let [cmf, flg] = header;
    let method = cmf & 0x0F;
    let window = cmf >> 4;
    let check = ((u16::from(cmf) << 8) | u16::from(flg)) % 31;

    if method != 8 || window != 7 || check != 0 || flg & FDICT != 0 {
        return Err(Error::unsupported_zlib_header(header));
    }
    Ok(())
}

/// Compresses everything written to it into a zlib stream on `W`.
///
/// The header is written on construction. [`ZlibEncoder::finish`] must be
/// called to flush the DEFLATE data and write the checksum; dropping the
/// encoder leaves the stream without its trailer, which decoders will report
/// as truncated.
pub struct ZlibEncoder<W: Write> {
    inner: flate2::write::DeflateEncoder<W>,
    checksum: Adler32,
    finished: bool,
}

impl<W: Write> ZlibEncoder<W> {
    pub fn new(mut writer: W, level: Compression) -> io::Result<Self> {
        let header = header(level);
        writer.write_all(&header)?;
        debug!(
            "wrote zlib header {:#04x} {:#04x} for level {}",
            header[0],
            header[1],
            level.level()
        );

        Ok(Self {
            inner: flate2::write::DeflateEncoder::new(writer, level),
            checksum: Adler32::new(),
            finished: false,
        })
    }

    /// Gets a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    /// Number of uncompressed bytes written so far.
    pub fn total_in(&self) -> u64 {
        self.inner.total_in()
    }

    /// Flush all compressed data and append the checksum. Further writes
    /// fail. Calling it again does nothing.
    pub fn try_finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.inner.try_finish()?;

        let sum = self.checksum.finish();
        self.inner.get_mut().write_all(&sum.to_be_bytes())?;
        self.finished = true;
        debug!(
            "finished zlib stream: {} bytes in, adler-32 {:#010x}",
            self.inner.total_in(),
            sum
        );
        Ok(())
    }

    /// Finish the stream and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.try_finish()?;
        self.inner.finish()
    }
}

impl<W: Write> Write for ZlibEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.finished {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "write to a finished zlib stream",
            ));
        }
        let n = self.inner.write(buf)?;
        self.checksum.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Decompresses a zlib stream read from `R`.
///
/// The header is checked on construction. When the DEFLATE data ends the
/// trailer is read and compared against the checksum of everything this
/// decoder produced, a mismatch is returned as an error from `read` instead
/// of the end of the stream.
///
/// Errors from this type are `io::Error`s wrapping a crate
/// [`Error`][crate::error::Error], convert them back with `From` to get the
/// [`ErrorKind`][crate::error::ErrorKind].
pub struct ZlibDecoder<R: Read> {
    inner: flate2::bufread::DeflateDecoder<BufReader<R>>,
    checksum: Adler32,
    done: bool,
}

impl<R: Read> ZlibDecoder<R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        let mut header = [0u8; 2];
        reader.read_exact(&mut header)?;
        check_header(header)?;
        debug!(
            "accepted zlib header {:#04x} {:#04x}",
            header[0], header[1]
        );

        Ok(Self {
            // The bufread decoder only consumes the DEFLATE data, which leaves
            // the trailer in the BufReader for us.
            inner: flate2::bufread::DeflateDecoder::new(BufReader::new(reader)),
            checksum: Adler32::new(),
            done: false,
        })
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref().get_ref()
    }

    /// Consumes this decoder, returning the underlying reader. Input that was
    /// buffered but not yet decompressed is lost.
    pub fn into_inner(self) -> R {
        self.inner.into_inner().into_inner()
    }

    /// Number of decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.inner.total_out()
    }

    fn verify_trailer(&mut self) -> io::Result<()> {
        let mut trailer = [0u8; 4];
        self.inner.get_mut().read_exact(&mut trailer)?;

        let expected = u32::from_be_bytes(trailer);
        let computed = self.checksum.finish();
        if expected != computed {
            return Err(Error::checksum_mismatch(expected, computed).into());
        }
        debug!("verified adler-32 {:#010x}", computed);
        Ok(())
    }
}

impl<R: Read> Read for ZlibDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.done || buf.is_empty() {
            return Ok(0);
        }

        let n = self.inner.read(buf)?;
        if n == 0 {
            self.verify_trailer()?;
            self.done = true;
            return Ok(0);
        }

        self.checksum.update(&buf[..n]);
        Ok(n)
    }
}

/// Compress a buffer into a complete zlib stream.
pub fn compress(data: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), level)?;
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a complete zlib stream, verifying its checksum.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data)?;
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
