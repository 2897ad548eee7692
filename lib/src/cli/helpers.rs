// Copyright (c) 2022-2023 The MobileCoin Foundation

/// Fixed length hex encoded argument
#[derive(Clone, PartialEq, Debug)]
pub struct HexData<const N: usize = 32>(pub [u8; N]);

impl<const N: usize> std::str::FromStr for HexData<N> {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut b = [0u8; N];

        hex::decode_to_slice(s, &mut b)?;

        Ok(HexData(b))
    }
}

impl<const N: usize> AsRef<[u8; N]> for HexData<N> {
    fn as_ref(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> std::fmt::Display for HexData<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Variable length hex encoded argument
#[derive(Clone, PartialEq, Debug)]
pub struct HexVec(pub Vec<u8>);

impl std::str::FromStr for HexVec {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(HexVec)
    }
}

impl AsRef<[u8]> for HexVec {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Parse a decimal or `0x` prefixed hex address
pub fn parse_address(s: &str) -> anyhow::Result<u8> {
    let a = match s.strip_prefix("0x") {
        Some(h) => u8::from_str_radix(h, 16)?,
        None => s.parse()?,
    };
    Ok(a)
}
