use byteorder::{BigEndian, ByteOrder};
use crc::{Crc, CRC_32_MPEG_2};
use thiserror::Error;

use crate::config;

/// CRC-32/MPEG-2 calculator.
const CRC_MPEG2: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame magic: expected 0x{expected:02X}, got 0x{got:02X}")]
    BadMagic { expected: u8, got: u8 },
    #[error("frame too short: need {need} bytes, have {have}")]
    TooShort { need: usize, have: usize },
    #[error("payload of {0} bytes does not fit a 16-bit length field")]
    PayloadTooLong(usize),
    #[error("CRC mismatch: expected 0x{expected:08X}, got 0x{computed:08X}")]
    ChecksumMismatch { expected: u32, computed: u32 },
}

// Header field offsets
const OFF_MAGIC: usize = 0;
const OFF_LENGTH: usize = 1;
const OFF_CRC: usize = 3;

/// Parsed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub payload_length: u16,
    pub crc: u32,
}

impl FrameHeader {
    /// Total framed size in bits, header included.
    pub fn total_bits(&self) -> usize {
        (config::FRAME_HEADER_SIZE + self.payload_length as usize) * 8
    }

    /// Parse the first `FRAME_HEADER_SIZE` bytes of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() < config::FRAME_HEADER_SIZE {
            return Err(FrameError::TooShort {
                need: config::FRAME_HEADER_SIZE,
                have: data.len(),
            });
        }

        let magic = data[OFF_MAGIC];
        if magic != config::FRAME_MAGIC {
            return Err(FrameError::BadMagic {
                expected: config::FRAME_MAGIC,
                got: magic,
            });
        }

        Ok(Self {
            payload_length: BigEndian::read_u16(&data[OFF_LENGTH..OFF_CRC]),
            crc: BigEndian::read_u32(&data[OFF_CRC..config::FRAME_HEADER_SIZE]),
        })
    }

    pub fn write(&self, buf: &mut [u8]) {
        buf[OFF_MAGIC] = config::FRAME_MAGIC;
        BigEndian::write_u16(&mut buf[OFF_LENGTH..OFF_CRC], self.payload_length);
        BigEndian::write_u32(&mut buf[OFF_CRC..config::FRAME_HEADER_SIZE], self.crc);
    }
}

/// Compute CRC-32/MPEG-2 over a byte slice.
pub fn crc32_mpeg2(data: &[u8]) -> u32 {
    CRC_MPEG2.checksum(data)
}

/// Prefix `payload` with a magic/length/CRC header.
pub fn seal(payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    let payload_length =
        u16::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLong(payload.len()))?;
    let header = FrameHeader {
        payload_length,
        crc: crc32_mpeg2(payload),
    };

    let mut framed = vec![0u8; config::FRAME_HEADER_SIZE + payload.len()];
    header.write(&mut framed[..config::FRAME_HEADER_SIZE]);
    framed[config::FRAME_HEADER_SIZE..].copy_from_slice(payload);
    Ok(framed)
}

/// Validate a framed buffer and return its payload.
pub fn open(framed: &[u8]) -> Result<&[u8], FrameError> {
    let header = FrameHeader::parse(framed)?;
    let end = config::FRAME_HEADER_SIZE + header.payload_length as usize;
    if framed.len() < end {
        return Err(FrameError::TooShort {
            need: end,
            have: framed.len(),
        });
    }

    let payload = &framed[config::FRAME_HEADER_SIZE..end];
    let computed = crc32_mpeg2(payload);
    if computed != header.crc {
        return Err(FrameError::ChecksumMismatch {
            expected: header.crc,
            computed,
        });
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_mpeg2_known_value() {
        assert_eq!(crc32_mpeg2(b"123456789"), 0x0376E6E7);
    }

    #[test]
    fn test_seal_layout() {
        let framed = seal(b"hi").unwrap();
        assert_eq!(framed.len(), config::FRAME_HEADER_SIZE + 2);
        assert_eq!(framed[0], config::FRAME_MAGIC);
        assert_eq!(&framed[1..3], &[0u8, 2]);
        assert_eq!(BigEndian::read_u32(&framed[3..7]), crc32_mpeg2(b"hi"));
        assert_eq!(&framed[7..], b"hi");

        let header = FrameHeader::parse(&framed).unwrap();
        assert_eq!(header.payload_length, 2);
        assert_eq!(header.total_bits(), 72);
    }

    #[test]
    fn test_open_returns_payload() {
        let framed = seal(b"owner:42").unwrap();
        assert_eq!(open(&framed).unwrap(), b"owner:42");
    }

    #[test]
    fn test_open_detects_corruption() {
        let mut framed = seal(b"owner:42").unwrap();
        framed[9] ^= 0x01;
        assert!(matches!(
            open(&framed),
            Err(FrameError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_magic_and_short_input() {
        let mut framed = seal(b"x").unwrap();
        framed[0] = 0x00;
        assert_eq!(
            open(&framed),
            Err(FrameError::BadMagic {
                expected: config::FRAME_MAGIC,
                got: 0
            })
        );
        assert!(matches!(
            FrameHeader::parse(&[config::FRAME_MAGIC, 0]),
            Err(FrameError::TooShort { need: 7, have: 2 })
        ));

        let framed = seal(b"abc").unwrap();
        assert!(matches!(
            open(&framed[..8]),
            Err(FrameError::TooShort { need: 10, have: 8 })
        ));
    }

    #[test]
    fn test_payload_too_long() {
        let big = vec![0u8; 70_000];
        assert_eq!(seal(&big), Err(FrameError::PayloadTooLong(70_000)));
    }
}
