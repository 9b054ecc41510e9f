use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BitsError {
    #[error("character {ch:?} at index {index} does not fit in a single byte")]
    Encoding { ch: char, index: usize },
}

/// Map each character of `text` to one byte.
/// Fails on the first character above U+00FF.
pub fn text_to_bytes(text: &str) -> Result<Vec<u8>, BitsError> {
    text.chars()
        .enumerate()
        .map(|(index, ch)| u8::try_from(ch).map_err(|_| BitsError::Encoding { ch, index }))
        .collect()
}

/// Expand bytes into bits, most significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Pack bits into bytes, MSB first. A trailing group shorter than 8 is dropped.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|group| group.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1)))
        .collect()
}

/// Map bytes back to characters and strip trailing NULs.
pub fn bytes_to_text(bytes: &[u8]) -> String {
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();
    text.trim_end_matches('\0').to_string()
}

/// Encode single-byte text into its bit sequence.
pub fn encode(text: &str) -> Result<Vec<u8>, BitsError> {
    Ok(bytes_to_bits(&text_to_bytes(text)?))
}

/// Decode a bit sequence into text.
pub fn decode(bits: &[u8]) -> String {
    bytes_to_text(&bits_to_bytes(bits))
}
