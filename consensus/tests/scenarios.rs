//! End-to-end protocol scenarios on an in-process six-validator cluster
//! (n = 6, f = 1: finality quorum 5, notarisation quorum 3).

use sprint_consensus::{ValidationError, Validator, VotePayload};
use sprint_crypto::{derive_address, keypair_from_seed};
use sprint_transactions::{build_payment, build_recovery, Transaction};
use sprint_types::{Address, Amount, KeyPair, Mode, ProtocolParams, ValidatorSet};

const N: usize = 6;
const F: usize = 1;

struct Cluster {
    validators: Vec<Validator>,
}

impl Cluster {
    fn new(mode: Mode, genesis: &[(Address, Amount)]) -> Self {
        let keys: Vec<KeyPair> = (0..N as u8)
            .map(|i| keypair_from_seed(&[i + 1; 32]))
            .collect();
        let set = ValidatorSet::new(keys.iter().map(|k| derive_address(&k.public)).collect());
        let validators = keys
            .into_iter()
            .map(|kp| {
                let mut v =
                    Validator::new(ProtocolParams::new(F, N, mode), set.clone(), kp).unwrap();
                v.seed_genesis(genesis);
                v
            })
            .collect();
        Self { validators }
    }

    /// Submit a signed envelope to every validator; count acceptances.
    fn submit_to_all(&mut self, tx: &Transaction) -> usize {
        let raw = tx.encode();
        self.validators
            .iter_mut()
            .map(|v| v.on_transaction(&raw).is_ok())
            .filter(|ok| *ok)
            .count()
    }

    fn submit_to(&mut self, idx: usize, tx: &Transaction) -> Result<(), ValidationError> {
        self.validators[idx].on_transaction(&tx.encode()).map(|_| ())
    }

    /// Flood-deliver queued votes between validators until no outbox emits
    /// anything new. Models a lossless, possibly-reordering network.
    fn deliver_until_quiet(&mut self) {
        loop {
            let mut pending = Vec::new();
            for (i, v) in self.validators.iter_mut().enumerate() {
                for vote in v.take_outbox() {
                    pending.push((i, vote));
                }
            }
            if pending.is_empty() {
                break;
            }
            for (origin, vote) in pending {
                for (i, v) in self.validators.iter_mut().enumerate() {
                    if i != origin {
                        v.on_vote(vote.clone()).unwrap();
                    }
                }
            }
        }
    }

    fn assert_account_everywhere(
        &self,
        addr: &Address,
        balance: u128,
        nonce: u64,
        finalised: Option<u64>,
    ) {
        for (i, v) in self.validators.iter().enumerate() {
            let acct = v.account(addr);
            assert_eq!(acct.balance, Amount::new(balance), "balance at validator {i}");
            assert_eq!(acct.nonce, nonce, "nonce at validator {i}");
            assert_eq!(acct.finalised, finalised, "finalised at validator {i}");
            assert!(!acct.pending, "pending at validator {i}");
        }
    }
}

fn alice() -> KeyPair {
    keypair_from_seed(&[100u8; 32])
}

fn alice_addr() -> Address {
    derive_address(&alice().public)
}

fn recipient(n: u8) -> Address {
    derive_address(&keypair_from_seed(&[150 + n; 32]).public)
}

fn genesis(balance: u128) -> Vec<(Address, Amount)> {
    vec![(alice_addr(), Amount::new(balance))]
}

#[test]
fn happy_path_single_round_trip() {
    let mut cluster = Cluster::new(Mode::Recovery, &genesis(1000));
    let tx = build_payment(&alice(), recipient(1), Amount::new(100), 0);

    assert_eq!(cluster.submit_to_all(&tx), N);
    cluster.deliver_until_quiet();

    cluster.assert_account_everywhere(&alice_addr(), 900, 1, Some(0));
    for v in &cluster.validators {
        assert_eq!(v.account(&recipient(1)).balance, Amount::new(100));
    }
}

#[test]
fn three_sequential_payments() {
    let mut cluster = Cluster::new(Mode::Recovery, &genesis(1000));

    for (amount, nonce) in [(100u128, 0u64), (200, 1), (50, 2)] {
        let tx = build_payment(&alice(), recipient(1), Amount::new(amount), nonce);
        assert_eq!(cluster.submit_to_all(&tx), N);
        cluster.deliver_until_quiet();
    }

    cluster.assert_account_everywhere(&alice_addr(), 650, 3, Some(2));
    for v in &cluster.validators {
        assert_eq!(v.account(&recipient(1)).balance, Amount::new(350));
    }
}

#[test]
fn insufficient_balance_rejected_everywhere() {
    let mut cluster = Cluster::new(Mode::Recovery, &genesis(100));
    let tx = build_payment(&alice(), recipient(1), Amount::new(200), 0);

    assert_eq!(cluster.submit_to_all(&tx), 0);
    cluster.deliver_until_quiet();

    cluster.assert_account_everywhere(&alice_addr(), 100, 0, None);
}

#[test]
fn wrong_nonce_rejected_everywhere() {
    let mut cluster = Cluster::new(Mode::Recovery, &genesis(1000));
    let tx = build_payment(&alice(), recipient(1), Amount::new(10), 5);

    assert_eq!(cluster.submit_to_all(&tx), 0);
    cluster.deliver_until_quiet();

    cluster.assert_account_everywhere(&alice_addr(), 1000, 0, None);
}

#[test]
fn three_three_equivocation_advances_without_finalising() {
    let mut cluster = Cluster::new(Mode::Recovery, &genesis(1000));

    // Finalise a first payment so the equivocation happens at nonce 1.
    let first = build_payment(&alice(), recipient(1), Amount::new(100), 0);
    assert_eq!(cluster.submit_to_all(&first), N);
    cluster.deliver_until_quiet();

    // The client equivocates: half the validators see each transaction.
    let tx_a = build_payment(&alice(), recipient(2), Amount::new(10), 1);
    let tx_b = build_payment(&alice(), recipient(3), Amount::new(20), 1);
    for i in 0..3 {
        cluster.submit_to(i, &tx_a).unwrap();
    }
    for i in 3..6 {
        cluster.submit_to(i, &tx_b).unwrap();
    }
    cluster.deliver_until_quiet();

    // Both sides reach notarisation (3) but neither reaches finality (5):
    // the nonce advances, nothing executes.
    cluster.assert_account_everywhere(&alice_addr(), 900, 2, Some(0));
    for v in &cluster.validators {
        assert_eq!(v.account(&recipient(2)).balance, Amount::ZERO);
        assert_eq!(v.account(&recipient(3)).balance, Amount::ZERO);
    }
}

#[test]
fn six_way_split_forces_bottom_then_recovery() {
    let mut cluster = Cluster::new(Mode::Recovery, &genesis(1000));

    let first = build_payment(&alice(), recipient(0), Amount::new(100), 0);
    assert_eq!(cluster.submit_to_all(&first), N);
    cluster.deliver_until_quiet();

    // Six distinct transactions at nonce 1, one per validator.
    for i in 0..N {
        let tx = build_payment(&alice(), recipient(i as u8 + 1), Amount::new(10), 1);
        cluster.submit_to(i, &tx).unwrap();
    }
    cluster.deliver_until_quiet();

    // Every payload stuck at one vote, ≥ n − f distinct voters seen: each
    // correct validator casts ⊥, a ⊥ notarisation forms, nonce advances.
    cluster.assert_account_everywhere(&alice_addr(), 900, 2, Some(0));
    for v in &cluster.validators {
        let addr = alice_addr();
        assert!(v
            .recovery_info(&addr)
            .unwrap()
            .chain
            .iter()
            .any(|c| c.payload == VotePayload::Bottom));
    }

    // The snapshot tells the client to anchor the recovery at the finalised
    // payment (everything since went to ⊥).
    let info = cluster.validators[0].recovery_info(&alice_addr()).unwrap();
    assert_eq!(info.finalised_nonce, Some(0));
    assert_eq!(info.current_nonce, 2);
    assert_eq!(info.suggested_tip(), Some(first.hash()));

    // Recovery at nonce 2 with the tip pointing at the finalised payment.
    let rec = build_recovery(&alice(), &Address::recovery_sentinel(), 2, &first);
    assert_eq!(cluster.submit_to_all(&rec), N);
    cluster.deliver_until_quiet();

    // The tip was already executed: finalised advances, balances unchanged.
    cluster.assert_account_everywhere(&alice_addr(), 900, 3, Some(2));
    for v in &cluster.validators {
        assert_eq!(v.account(&recipient(0)).balance, Amount::new(100));
    }
}

#[test]
fn recovery_unlocks_fresh_payments() {
    // After the six-way split recovers, an ordinary payment goes through.
    let mut cluster = Cluster::new(Mode::Recovery, &genesis(1000));

    let first = build_payment(&alice(), recipient(0), Amount::new(100), 0);
    cluster.submit_to_all(&first);
    cluster.deliver_until_quiet();

    for i in 0..N {
        let tx = build_payment(&alice(), recipient(i as u8 + 1), Amount::new(10), 1);
        cluster.submit_to(i, &tx).unwrap();
    }
    cluster.deliver_until_quiet();

    let rec = build_recovery(&alice(), &Address::recovery_sentinel(), 2, &first);
    cluster.submit_to_all(&rec);
    cluster.deliver_until_quiet();

    let next = build_payment(&alice(), recipient(9), Amount::new(50), 3);
    assert_eq!(cluster.submit_to_all(&next), N);
    cluster.deliver_until_quiet();

    cluster.assert_account_everywhere(&alice_addr(), 850, 4, Some(3));
    for v in &cluster.validators {
        assert_eq!(v.account(&recipient(9)).balance, Amount::new(50));
    }
}

#[test]
fn replay_after_finalisation_is_nonce_mismatch() {
    let mut cluster = Cluster::new(Mode::Recovery, &genesis(1000));
    let tx = build_payment(&alice(), recipient(1), Amount::new(100), 0);
    cluster.submit_to_all(&tx);
    cluster.deliver_until_quiet();

    let before = cluster.validators[0].account(&alice_addr());
    let result = cluster.validators[0].on_transaction(&tx.encode());
    assert_eq!(
        result,
        Err(ValidationError::NonceMismatch { expected: 1, got: 0 })
    );
    assert_eq!(cluster.validators[0].account(&alice_addr()), before);
}

#[test]
fn classic_mode_happy_path() {
    let mut cluster = Cluster::new(Mode::Classic, &genesis(1000));
    let tx = build_payment(&alice(), recipient(1), Amount::new(100), 0);

    assert_eq!(cluster.submit_to_all(&tx), N);
    cluster.deliver_until_quiet();

    cluster.assert_account_everywhere(&alice_addr(), 900, 1, Some(0));
}

#[test]
fn classic_mode_split_locks_account_forever() {
    let mut cluster = Cluster::new(Mode::Classic, &genesis(1000));

    // 3/3 equivocation: neither side can reach the single n − f = 5 quorum
    // and there is no bottom vote to break the tie.
    let tx_a = build_payment(&alice(), recipient(2), Amount::new(10), 0);
    let tx_b = build_payment(&alice(), recipient(3), Amount::new(20), 0);
    for i in 0..3 {
        cluster.submit_to(i, &tx_a).unwrap();
    }
    for i in 3..6 {
        cluster.submit_to(i, &tx_b).unwrap();
    }
    cluster.deliver_until_quiet();

    for v in &cluster.validators {
        let acct = v.account(&alice_addr());
        assert_eq!(acct.nonce, 0);
        assert!(acct.pending, "classic split must stay locked");
        assert_eq!(acct.finalised, None);
        assert_eq!(acct.balance, Amount::new(1000));
    }
}
