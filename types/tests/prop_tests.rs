//! Property tests for the fundamental types.

use proptest::prelude::*;
use sprint_types::{Amount, Signature, TxHash};

proptest! {
    #[test]
    fn amount_checked_sub_never_underflows(a in any::<u128>(), b in any::<u128>()) {
        let x = Amount::new(a);
        let y = Amount::new(b);
        match x.checked_sub(y) {
            Some(d) => prop_assert_eq!(d.raw(), a - b),
            None => prop_assert!(b > a),
        }
    }

    #[test]
    fn amount_saturating_ops_stay_in_range(a in any::<u128>(), b in any::<u128>()) {
        let x = Amount::new(a);
        let y = Amount::new(b);
        prop_assert_eq!(x.saturating_sub(y).raw(), a.saturating_sub(b));
        prop_assert_eq!(x.saturating_add(y).raw(), a.saturating_add(b));
    }

    #[test]
    fn tx_hash_display_parses_back(bytes in any::<[u8; 32]>()) {
        let h = TxHash::new(bytes);
        let hex = h.to_string();
        prop_assert_eq!(hex.len(), 64);
        let decoded: Vec<u8> = (0..64)
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
            .collect();
        prop_assert_eq!(decoded.as_slice(), h.as_bytes().as_slice());
    }

    #[test]
    fn signature_bincode_round_trip(seed in any::<u8>()) {
        let sig = Signature([seed; 64]);
        let bytes = bincode::serialize(&sig).unwrap();
        let back: Signature = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(sig, back);
    }
}
