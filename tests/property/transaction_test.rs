// tests/property/transaction_test.rs

//! Property-based tests for the memo transaction layout

use actionchain::core::transaction::{PACKET_DATA_SIZE, UnsignedTransaction};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use proptest::prelude::*;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;

/// Serialized size of the compute-price + memo transaction for an `n` byte memo:
/// 65 bytes of signature slots, a 3 byte header, 3 account keys, the blockhash,
/// the 12 byte compute budget instruction and the memo instruction.
fn expected_len(n: usize) -> usize {
    let len_prefix = if n < 0x80 { 1 } else { 2 };
    65 + 3 + 1 + 3 * 32 + 32 + 1 + 12 + 2 + len_prefix + n
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_memo_bytes_are_carried_verbatim(
        payer in any::<[u8; 32]>(),
        blockhash in any::<[u8; 32]>(),
        memo in "\\PC{1,200}",
        price in any::<u64>(),
    ) {
        let payer = Pubkey::new_from_array(payer);
        let tx = UnsignedTransaction::memo(&payer, &memo, price, Hash::new_from_array(blockhash));
        let bytes = tx.serialize().unwrap();

        prop_assert_eq!(bytes.len(), expected_len(memo.len()));
        prop_assert_eq!(&bytes[69..101], payer.as_ref());
        prop_assert!(bytes.ends_with(memo.as_bytes()));

        let decoded = STANDARD.decode(tx.to_base64().unwrap()).unwrap();
        prop_assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_packet_limit_is_exact(n in 900usize..1100) {
        let memo = "a".repeat(n);
        let tx = UnsignedTransaction::memo(&Pubkey::new_unique(), &memo, 1000, Hash::default());

        let fits = expected_len(n) <= PACKET_DATA_SIZE;
        prop_assert_eq!(tx.serialize().is_ok(), fits);
    }

    #[test]
    fn test_blockhash_swap_keeps_layout(
        first in any::<[u8; 32]>(),
        second in any::<[u8; 32]>(),
        memo in "[a-z ]{1,64}",
    ) {
        let payer = Pubkey::new_unique();
        let draft = UnsignedTransaction::memo(&payer, &memo, 1000, Hash::new_from_array(first));
        let final_tx = draft.clone().with_recent_blockhash(Hash::new_from_array(second));

        let a = draft.serialize().unwrap();
        let b = final_tx.serialize().unwrap();
        prop_assert_eq!(a.len(), b.len());
        prop_assert_eq!(final_tx.recent_blockhash(), &Hash::new_from_array(second));
        prop_assert_eq!(&a[..101], &b[..101]);
    }
}
