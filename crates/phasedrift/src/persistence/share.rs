//! Base64url share tokens
//!
//! Tokens use the URL-safe alphabet without padding, so they can be pasted
//! into a query string as-is. Decoding is strict: anything a conforming
//! encoder could not have produced is rejected.

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const INVALID: u8 = 255;

const DECODE_TABLE: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < 64 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    InvalidCharacter { position: usize, byte: u8 },
    InvalidLength(usize),
    NonCanonicalTrailingBits,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidCharacter { position, byte } => {
                write!(f, "invalid character 0x{byte:02x} at position {position}")
            }
            DecodeError::InvalidLength(len) => write!(f, "invalid token length {len}"),
            DecodeError::NonCanonicalTrailingBits => f.write_str("non-canonical trailing bits"),
        }
    }
}

impl std::error::Error for DecodeError {}

pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b = [
            chunk[0],
            chunk.get(1).copied().unwrap_or(0),
            chunk.get(2).copied().unwrap_or(0),
        ];
        let group = (u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2]);

        // n input bytes produce n + 1 output characters
        for i in 0..=chunk.len() {
            let index = (group >> (18 - 6 * i)) & 0x3f;
            out.push(ALPHABET[index as usize] as char);
        }
    }
    out
}

pub fn decode(token: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = token.as_bytes();
    if bytes.len() % 4 == 1 {
        return Err(DecodeError::InvalidLength(bytes.len()));
    }

    let mut out = Vec::with_capacity(bytes.len() * 3 / 4);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for (position, &byte) in bytes.iter().enumerate() {
        let value = DECODE_TABLE
            .get(byte as usize)
            .copied()
            .filter(|&v| v != INVALID)
            .ok_or(DecodeError::InvalidCharacter { position, byte })?;

        buffer = (buffer << 6) | u32::from(value);
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    if buffer != 0 {
        return Err(DecodeError::NonCanonicalTrailingBits);
    }

    Ok(out)
}
