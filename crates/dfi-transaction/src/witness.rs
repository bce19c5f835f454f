//! Segregated witness stack of one input.

use serde::{Deserialize, Serialize};

use dfi_primitives::compose::{ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter};

use crate::TransactionError;

/// Witness elements of one input: `varint(count) || (varint(len) || bytes)*`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// Raw elements, e.g. `[der_signature || sighash_type, pubkey]` for P2WPKH.
    #[serde(with = "hex_list")]
    pub scripts: Vec<Vec<u8>>,
}

impl Witness {
    /// Create a witness from its elements.
    pub fn new(scripts: Vec<Vec<u8>>) -> Self {
        Witness { scripts }
    }

    /// Whether the witness has no elements.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl Composable for Witness {
    type Error = TransactionError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, TransactionError> {
        Ok(Witness { scripts: Vec::<Vec<u8>>::read_from(reader, ctx)? })
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), TransactionError> {
        Ok(self.scripts.write_to(writer, ctx)?)
    }
}

mod hex_list {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(scripts: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(scripts.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| hex::decode(s).map_err(D::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_witness_layout() {
        let witness = Witness::new(vec![vec![0x30, 0x01], vec![0x02; 33]]);
        let bytes = witness.encode().unwrap();
        assert_eq!(&bytes[..4], &[0x02, 0x02, 0x30, 0x01]);
        assert_eq!(bytes[4], 33);
        assert_eq!(Witness::decode(&bytes).unwrap(), witness);

        assert_eq!(Witness::default().encode().unwrap(), vec![0x00]);
    }

    #[test]
    fn test_witness_json_is_hex() {
        let witness = Witness::new(vec![vec![0xab, 0xcd]]);
        let json = serde_json::to_string(&witness).unwrap();
        assert_eq!(json, r#"{"scripts":["abcd"]}"#);
        assert_eq!(serde_json::from_str::<Witness>(&json).unwrap(), witness);
    }
}
