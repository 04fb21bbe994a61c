// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use core::fmt::Write;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid character {c} at position {index}")]
    InvalidHexCharacter { c: char, index: usize },
    #[error("Odd number of digits")]
    OddLength,
}

pub fn encode<T>(data: T) -> String
where
    T: AsRef<[u8]>,
{
    let bytes: &[u8] = data.as_ref();
    let mut hex = String::with_capacity(bytes.len() * 2);
    for b in bytes.iter() {
        let _ = write!(hex, "{b:02x}");
    }
    hex
}

fn nibble(c: u8, index: usize) -> Result<u8, Error> {
    (c as char)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or(Error::InvalidHexCharacter {
            c: c as char,
            index,
        })
}

pub fn decode<T>(hex: T) -> Result<Vec<u8>, Error>
where
    T: AsRef<[u8]>,
{
    let hex: &[u8] = hex.as_ref();
    if hex.len() % 2 != 0 {
        return Err(Error::OddLength);
    }
    hex.chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| Ok((nibble(pair[0], 2 * i)? << 4) | nibble(pair[1], 2 * i + 1)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        assert_eq!(encode([0xde, 0xad, 0xbe, 0xef]), "deadbeef");
        assert_eq!(decode("DEADbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(decode("abc").unwrap_err(), Error::OddLength);
        assert_eq!(
            decode("0z").unwrap_err(),
            Error::InvalidHexCharacter { c: 'z', index: 1 }
        );
    }
}
