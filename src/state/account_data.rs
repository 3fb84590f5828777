//! Little-endian account-data reader for on-chain whirlpool accounts.

use solana_sdk::pubkey::Pubkey;

use crate::error::{QuoteError, Result};

/// Anchor account discriminator length
pub const DISCRIMINATOR_LEN: usize = 8;

/// Cursor over raw account bytes. Every read is bounds-checked; a short
/// buffer surfaces as `AccountDeserializeError` rather than a panic.
pub struct AccountReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> AccountReader<'a> {
    /// Positions the cursor after the 8-byte discriminator.
    pub fn new(buffer: &'a [u8]) -> Result<Self> {
        if buffer.len() < DISCRIMINATOR_LEN {
            return Err(QuoteError::AccountDeserializeError);
        }
        Ok(Self { buffer, offset: DISCRIMINATOR_LEN })
    }

    fn take(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(length)
            .filter(|end| *end <= self.buffer.len())
            .ok_or(QuoteError::AccountDeserializeError)?;
        let bytes = &self.buffer[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    pub fn read_u128(&mut self) -> Result<u128> {
        Ok(u128::from_le_bytes(self.take(16)?.try_into().unwrap()))
    }

    pub fn read_i128(&mut self) -> Result<i128> {
        Ok(i128::from_le_bytes(self.take(16)?.try_into().unwrap()))
    }

    pub fn read_pubkey(&mut self) -> Result<Pubkey> {
        Pubkey::try_from(self.take(32)?).map_err(|_| QuoteError::AccountDeserializeError)
    }

    pub fn skip(&mut self, length: usize) -> Result<()> {
        self.take(length).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_order() {
        let pubkey = Pubkey::new_unique();
        let mut data = vec![0u8; DISCRIMINATOR_LEN];
        data.extend_from_slice(&7u16.to_le_bytes());
        data.extend_from_slice(&(-5i32).to_le_bytes());
        data.extend_from_slice(&pubkey.to_bytes());
        let mut reader = AccountReader::new(&data).unwrap();
        assert_eq!(reader.read_u16().unwrap(), 7);
        assert_eq!(reader.read_i32().unwrap(), -5);
        assert_eq!(reader.read_pubkey().unwrap(), pubkey);
    }

    #[test]
    fn short_buffer_is_an_error() {
        let data = vec![0u8; DISCRIMINATOR_LEN + 1];
        let mut reader = AccountReader::new(&data).unwrap();
        assert_eq!(
            reader.read_u64().unwrap_err(),
            QuoteError::AccountDeserializeError
        );
    }
}
