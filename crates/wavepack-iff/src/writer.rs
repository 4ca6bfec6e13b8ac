//! Minimal 8SVX writer (FORM + VHDR + BODY)
//!
//! Produces files the parser reads back unchanged; used to build
//! fixtures and to re-export voices.

use byteorder::{BigEndian, WriteBytesExt};

use crate::parser::{BODY_ID, FORM_ID, SVX_TYPE, VHDR_ID};
use crate::ParsedVoice;

const VHDR_LEN: u32 = 20;

/// Encode a voice as a FORM/8SVX file
pub fn encode_8svx(voice: &ParsedVoice) -> Vec<u8> {
    let body_len = voice.pcm.len() as u32;
    let body_pad = body_len & 1;
    let form_len = 4 + (8 + VHDR_LEN) + (8 + body_len + body_pad);

    let mut out = Vec::with_capacity(form_len as usize + 8);

    out.extend_from_slice(&FORM_ID);
    out.write_u32::<BigEndian>(form_len).unwrap();
    out.extend_from_slice(&SVX_TYPE);

    out.extend_from_slice(&VHDR_ID);
    out.write_u32::<BigEndian>(VHDR_LEN).unwrap();
    out.write_u32::<BigEndian>(voice.one_shot_length).unwrap();
    out.write_u32::<BigEndian>(0).unwrap(); // repeatHiSamples
    out.write_u32::<BigEndian>(0).unwrap(); // samplesPerHiCycle
    out.write_u16::<BigEndian>(voice.sample_rate.min(u32::from(u16::MAX)) as u16).unwrap();
    out.push(1); // ctOctave
    out.push(0); // sCompression: none
    out.write_u32::<BigEndian>(0x0001_0000).unwrap(); // volume 1.0 (16.16)

    out.extend_from_slice(&BODY_ID);
    out.write_u32::<BigEndian>(body_len).unwrap();
    out.extend_from_slice(&voice.pcm);
    if body_pad == 1 {
        out.push(0);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let voice = ParsedVoice {
            pcm: vec![1, 2, 3],
            sample_rate: 22050,
            one_shot_length: 3,
        };
        let data = encode_8svx(&voice);
        assert_eq!(&data[..4], b"FORM");
        assert_eq!(&data[8..12], b"8SVX");
        assert_eq!(&data[12..16], b"VHDR");
        // FORM size covers everything after the size field
        let form_len = u32::from_be_bytes([data[4], data[5], data[6], data[7]]) as usize;
        assert_eq!(form_len, data.len() - 8);
        assert_eq!(data.len() % 2, 0);
    }

    #[test]
    fn test_parser_reads_back() {
        let voice = ParsedVoice {
            pcm: vec![0x80, 0x7F, 0x00, 0x10, 0xEE],
            sample_rate: 8363,
            one_shot_length: 5,
        };
        let parsed = ParsedVoice::from_bytes(&encode_8svx(&voice)).unwrap();
        assert_eq!(parsed, voice);
    }
}
