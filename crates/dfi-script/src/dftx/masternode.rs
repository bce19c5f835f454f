//! Masternode payloads.

use dfi_primitives::chainhash::Hash;

dftx_struct! {
    /// Register a masternode (`C`).
    ///
    /// The operator key hash is optional: absent encodes as a single `0x00`,
    /// present as `0x14` followed by exactly 20 bytes.
    pub struct CreateMasternode {
        /// Address type of the collateral key (`0x01` P2PKH, `0x04` P2WPKH).
        pub node_type: u8,
        #[serde(with = "hex::serde")]
        pub collateral_pub_key_hash: [u8; 20],
        #[serde(default, with = "crate::dftx::hex_option")]
        pub operator_pub_key_hash: Option<[u8; 20]> => optional,
    }
}

dftx_struct! {
    /// Resign a masternode (`R`).
    pub struct ResignMasternode {
        pub node_id: Hash,
    }
}

dftx_struct! {
    /// New address for an owner, operator or reward update.
    pub struct UpdateMasternodeAddress {
        pub address_type: u8,
        #[serde(default, with = "crate::dftx::hex_option")]
        pub address_pub_key_hash: Option<[u8; 20]> => optional,
    }
}

dftx_struct! {
    /// One typed update.
    pub struct UpdateMasternodeData {
        /// `0x01` owner, `0x02` operator, `0x03` set reward, `0x04` remove reward.
        pub update_type: u8,
        pub address: UpdateMasternodeAddress,
    }
}

dftx_struct! {
    /// Update a masternode's addresses (`m`).
    pub struct UpdateMasternode {
        pub node_id: Hash,
        pub updates: Vec<UpdateMasternodeData>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfi_primitives::compose::Composable;
    use dfi_primitives::PrimitivesError;

    use crate::dftx::DfTx;
    use crate::ScriptError;

    const COLLATERAL: &str = "b5d2a4d5e8e1fb1b7a2e6e5cf1e9c2b4c7d8a9f0";
    const OPERATOR: &str = "4f1e9c2b4c7d8a9f0b5d2a4d5e8e1fb1b7a2e6e5";

    fn hash20(hex_str: &str) -> [u8; 20] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_create_without_operator() {
        let create = CreateMasternode {
            node_type: 0x01,
            collateral_pub_key_hash: hash20(COLLATERAL),
            operator_pub_key_hash: None,
        };
        let hex_str = format!("01{}00", COLLATERAL);
        assert_eq!(create.encode_hex().unwrap(), hex_str);
        assert_eq!(CreateMasternode::decode_hex(&hex_str).unwrap(), create);
    }

    #[test]
    fn test_create_with_operator() {
        let create = CreateMasternode {
            node_type: 0x04,
            collateral_pub_key_hash: hash20(COLLATERAL),
            operator_pub_key_hash: Some(hash20(OPERATOR)),
        };
        let hex_str = format!("04{}14{}", COLLATERAL, OPERATOR);
        assert_eq!(create.encode_hex().unwrap(), hex_str);
        assert_eq!(CreateMasternode::decode_hex(&hex_str).unwrap(), create);
    }

    #[test]
    fn test_operator_hash_of_wrong_width_names_field() {
        let hex_str = format!("01{}13{}", COLLATERAL, &OPERATOR[..38]);
        let err = CreateMasternode::decode_hex(&hex_str).unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Primitives(PrimitivesError::InvalidFieldWidth {
                field: "operator_pub_key_hash",
                expected: 20,
                got: 19,
            })
        ));

        // Inside an envelope the payload name is added to the message.
        let envelope = format!("4466547843{}", hex_str);
        let err = DfTx::decode_hex(&envelope).unwrap_err().to_string();
        assert!(err.contains("CreateMasternode"));
        assert!(err.contains("operator_pub_key_hash"));
    }

    #[test]
    fn test_update_masternode_roundtrip() {
        let update = UpdateMasternode {
            node_id: Hash::new([0x77; 32]),
            updates: vec![
                UpdateMasternodeData {
                    update_type: 0x02,
                    address: UpdateMasternodeAddress {
                        address_type: 0x04,
                        address_pub_key_hash: Some(hash20(OPERATOR)),
                    },
                },
                UpdateMasternodeData {
                    update_type: 0x04,
                    address: UpdateMasternodeAddress { address_type: 0x00, address_pub_key_hash: None },
                },
            ],
        };
        let bytes = update.encode().unwrap();
        assert_eq!(bytes.len(), 32 + 1 + (1 + 1 + 21) + (1 + 1 + 1));
        assert_eq!(UpdateMasternode::decode(&bytes).unwrap(), update);
    }

    #[test]
    fn test_json_hex_fields() {
        let create = CreateMasternode {
            node_type: 0x01,
            collateral_pub_key_hash: hash20(COLLATERAL),
            operator_pub_key_hash: None,
        };
        let json = serde_json::to_value(&create).unwrap();
        assert_eq!(json["collateralPubKeyHash"], COLLATERAL);
        assert!(json["operatorPubKeyHash"].is_null());
        let back: CreateMasternode = serde_json::from_value(json).unwrap();
        assert_eq!(back, create);
    }
}
