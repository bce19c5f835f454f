//! Satoshi fixed-point amounts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{ComposeContext, Composable};
use crate::util::{DfiReader, DfiWriter};
use crate::PrimitivesError;

/// Number of satoshis in one coin.
pub const COIN: u64 = 100_000_000;

/// A decimal amount scaled by 10^8, carried on the wire as u64 LE.
///
/// Displays and serializes as a fixed 8-decimal string (`"0.00000006"`),
/// matching the node's RPC output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    /// Zero coins.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a satoshi count.
    pub const fn from_sat(sat: u64) -> Self {
        Amount(sat)
    }

    /// Create an amount from a whole number of coins.
    ///
    /// # Returns
    /// The amount, or `InvalidAmount` on overflow.
    pub fn from_coins(coins: u64) -> Result<Self, PrimitivesError> {
        coins
            .checked_mul(COIN)
            .map(Amount)
            .ok_or_else(|| PrimitivesError::InvalidAmount(format!("{} coins overflows u64", coins)))
    }

    /// Return the satoshi count.
    pub const fn to_sat(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:08}", self.0 / COIN, self.0 % COIN)
    }
}

impl FromStr for Amount {
    type Err = PrimitivesError;

    /// Parse a decimal coin string with at most 8 fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PrimitivesError::InvalidAmount(s.to_string());
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || frac.len() > 8 {
            return Err(invalid());
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let frac_sat: u64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<8}", frac).parse().map_err(|_| invalid())?
        };
        whole
            .checked_mul(COIN)
            .and_then(|w| w.checked_add(frac_sat))
            .map(Amount)
            .ok_or_else(invalid)
    }
}

impl From<u64> for Amount {
    fn from(sat: u64) -> Self {
        Amount(sat)
    }
}

impl Composable for Amount {
    type Error = PrimitivesError;

    fn read_from(reader: &mut DfiReader<'_>, _ctx: &ComposeContext) -> Result<Self, PrimitivesError> {
        Ok(Amount(reader.read_u64_le()?))
    }

    fn write_to(&self, writer: &mut DfiWriter, _ctx: &ComposeContext) -> Result<(), PrimitivesError> {
        writer.write_u64_le(self.0);
        Ok(())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_fixed_point() {
        assert_eq!(Amount::from_sat(6).to_string(), "0.00000006");
        assert_eq!(Amount::from_sat(5 * COIN).to_string(), "5.00000000");
        assert_eq!(Amount::from_sat(123_456_789).to_string(), "1.23456789");
    }

    #[test]
    fn test_parse() {
        assert_eq!("1.5".parse::<Amount>().unwrap(), Amount::from_sat(150_000_000));
        assert_eq!("5".parse::<Amount>().unwrap(), Amount::from_coins(5).unwrap());
        assert_eq!("0.00000001".parse::<Amount>().unwrap(), Amount::from_sat(1));
        assert!("0.000000001".parse::<Amount>().is_err());
        assert!("-1".parse::<Amount>().is_err());
        assert!(".5".parse::<Amount>().is_err());
        assert!("184467440737.09551616".parse::<Amount>().is_err());
    }

    #[test]
    fn test_wire_u64_le() {
        let amount = Amount::from_coins(5).unwrap();
        assert_eq!(amount.encode_hex().unwrap(), "0065cd1d00000000");
        assert_eq!(Amount::decode_hex("0065cd1d00000000").unwrap(), amount);
    }

    #[test]
    fn test_json_string() {
        let amount = Amount::from_sat(6);
        assert_eq!(serde_json::to_string(&amount).unwrap(), r#""0.00000006""#);
        let back: Amount = serde_json::from_str(r#""0.00000006""#).unwrap();
        assert_eq!(back, amount);
    }
}
