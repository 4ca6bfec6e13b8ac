//! Signed 8SVX PCM to ES5503 unsigned PCM
//!
//! 8SVX stores samples as two's-complement i8 centered on 0. The ES5503
//! reads unsigned bytes centered on 0x80 and stops a sample at 0x00.

use crate::ParsedVoice;

/// Byte value the ES5503 treats as end-of-sample
pub const END_MARKER: u8 = 0x00;

/// Closest audible value to the end marker
const END_MARKER_ESCAPE: u8 = 0x01;

/// PCM ready for wave RAM; never contains [`END_MARKER`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodedSample {
    pub pcm: Vec<u8>,
    /// Carried through for logging
    pub sample_rate: u32,
}

impl TranscodedSample {
    pub fn from_voice(voice: &ParsedVoice) -> Self {
        Self {
            pcm: transcode(&voice.pcm),
            sample_rate: voice.sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.pcm.len()
    }
}

/// Convert one signed sample byte
#[inline]
pub fn transcode_byte(raw: u8) -> u8 {
    let signed = i16::from(raw as i8);
    let unsigned = ((signed + 128) & 0xFF) as u8;
    if unsigned == END_MARKER {
        END_MARKER_ESCAPE
    } else {
        unsigned
    }
}

/// Convert a whole BODY payload; output has the same length as the input
pub fn transcode(signed_pcm: &[u8]) -> Vec<u8> {
    signed_pcm.iter().map(|&b| transcode_byte(b)).collect()
}
