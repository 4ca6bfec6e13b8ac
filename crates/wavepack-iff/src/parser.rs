//! Parser for IFF/8SVX voice files
//!
//! Layout (all fields big-endian):
//! - `FORM` <u32 size> `8SVX`
//! - chunks: <fourcc> <u32 length> <payload> [pad byte if length is odd]
//!
//! Only `VHDR` (voice header) and `BODY` (signed 8-bit PCM) are read,
//! every other chunk is skipped whole.

use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};

use crate::{IffError, Result};

pub const FORM_ID: [u8; 4] = *b"FORM";
pub const SVX_TYPE: [u8; 4] = *b"8SVX";
pub const VHDR_ID: [u8; 4] = *b"VHDR";
pub const BODY_ID: [u8; 4] = *b"BODY";

/// Used when the voice header is missing or too short to carry a rate
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// oneShotHiSamples + repeatHiSamples + samplesPerHiCycle + samplesPerSec
const VHDR_RATE_END: u32 = 14;

/// Decoded contents of one 8SVX file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVoice {
    /// BODY payload exactly as stored (signed 8-bit PCM)
    pub pcm: Vec<u8>,
    /// Hz
    pub sample_rate: u32,
    /// Informational only
    pub one_shot_length: u32,
}

impl ParsedVoice {
    /// Read and parse an 8SVX file from disk
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_reader(Cursor::new(data))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }

    pub fn from_reader<R: Read + Seek>(inner: R) -> Result<Self> {
        let mut reader = ChunkReader::new(inner)?;

        let magic = reader.read_fourcc()?;
        if magic != FORM_ID {
            return Err(IffError::Format(format!(
                "not an IFF file (magic={})",
                fourcc_str(&magic)
            )));
        }

        let _form_size = reader.read_u32()?;

        let form_type = reader.read_fourcc()?;
        if form_type != SVX_TYPE {
            return Err(IffError::Format(format!(
                "not an 8SVX file (type={})",
                fourcc_str(&form_type)
            )));
        }

        let mut pcm = None;
        let mut sample_rate = DEFAULT_SAMPLE_RATE;
        let mut one_shot_length = 0;

        // Fewer than 4 trailing bytes cannot hold a chunk tag
        while reader.remaining()? >= 4 {
            let tag = reader.read_fourcc()?;
            let size = reader.read_u32()?;
            let start = reader.pos()?;
            let end = start + u64::from(size);

            if end > reader.len {
                return Err(IffError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "chunk {} at {} declares {} bytes, only {} remain",
                        fourcc_str(&tag),
                        start,
                        size,
                        reader.len - start
                    ),
                )));
            }

            match tag {
                VHDR_ID => {
                    if size >= 4 {
                        one_shot_length = reader.read_u32()?;
                    }
                    if size >= VHDR_RATE_END {
                        let _repeat_length = reader.read_u32()?;
                        let _samples_per_cycle = reader.read_u32()?;
                        sample_rate = u32::from(reader.read_u16()?);
                    } else {
                        tracing::debug!("  Short VHDR ({} bytes), assuming {} Hz", size, sample_rate);
                    }
                }
                BODY_ID => {
                    pcm = Some(reader.read_bytes(size as usize)?);
                }
                _ => {
                    tracing::trace!("  Skip chunk {} ({} bytes)", fourcc_str(&tag), size);
                }
            }

            // Chunks are word-aligned: odd payloads carry one pad byte
            reader.seek(SeekFrom::Start(end + u64::from(size & 1)))?;
        }

        let pcm = pcm.ok_or(IffError::MissingBody)?;

        Ok(ParsedVoice {
            pcm,
            sample_rate,
            one_shot_length,
        })
    }

    /// Playback length at the stored sample rate
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.pcm.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Printable form of a chunk tag for logs and errors
pub fn fourcc_str(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

/// Big-endian reader that knows the total stream length
struct ChunkReader<R: Read + Seek> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> ChunkReader<R> {
    fn new(mut inner: R) -> io::Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, len })
    }

    fn read_fourcc(&mut self) -> io::Result<[u8; 4]> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_u16(&mut self) -> io::Result<u16> {
        self.inner.read_u16::<BigEndian>()
    }

    fn read_u32(&mut self) -> io::Result<u32> {
        self.inner.read_u32::<BigEndian>()
    }

    fn read_bytes(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }

    fn pos(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    fn remaining(&mut self) -> io::Result<u64> {
        Ok(self.len.saturating_sub(self.pos()?))
    }
}
