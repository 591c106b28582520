//! The validator: ingress validation and the certificate processor.

use crate::account::AccountStore;
use crate::error::{RecoveryFault, ValidationError};
use crate::quorum;
use crate::recovery::{chain_start, RecoveryInfo, SnapshotError};
use crate::vote::{Vote, VotePayload};
use crate::vote_store::VoteStore;
use sprint_transactions::{Transaction, TxKind};
use sprint_types::{Address, Amount, KeyPair, Mode, ParamsError, ProtocolParams, TxHash, ValidatorSet};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One validator's complete protocol state.
///
/// All methods take `&mut self`; callers serialise access (a single event
/// loop, or a coarse lock as the node does). The validator itself never
/// performs I/O; votes to be broadcast accumulate in an outbox the
/// embedding node drains after each ingress call.
pub struct Validator {
    params: ProtocolParams,
    validators: ValidatorSet,
    keypair: KeyPair,
    address: Address,
    accounts: AccountStore,
    votes: VoteStore,
    /// Transaction bodies seen through ingress (and tips embedded in
    /// recovery envelopes), keyed by content hash. A finality certificate
    /// executes only once the body is known.
    tx_index: HashMap<TxHash, Transaction>,
    outbox: Vec<Vote>,
}

impl Validator {
    /// Build a validator. Fails when the parameters violate the fault-model
    /// precondition for the configured mode.
    pub fn new(
        params: ProtocolParams,
        validators: ValidatorSet,
        keypair: KeyPair,
    ) -> Result<Self, ParamsError> {
        params.validate()?;
        let address = sprint_crypto::derive_address(&keypair.public);
        Ok(Self {
            params,
            validators,
            keypair,
            address,
            accounts: AccountStore::new(),
            votes: VoteStore::new(),
            tx_index: HashMap::new(),
            outbox: Vec::new(),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn validator_set(&self) -> &ValidatorSet {
        &self.validators
    }

    /// Snapshot of one account's state.
    pub fn account(&self, addr: &Address) -> crate::Account {
        self.accounts.get(addr)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Seed balances from the genesis allocation.
    pub fn seed_genesis(&mut self, allocations: &[(Address, Amount)]) {
        self.accounts.seed_genesis(allocations);
    }

    /// Votes queued for peer broadcast since the last drain.
    pub fn take_outbox(&mut self) -> Vec<Vote> {
        std::mem::take(&mut self.outbox)
    }

    // ── Transaction ingress ──────────────────────────────────────────────

    /// Validate a signed transfer and, on success, cast and return the
    /// self-vote. The vote is also queued in the outbox.
    ///
    /// A rejected transaction mutates nothing.
    pub fn on_transaction(&mut self, raw: &[u8]) -> Result<Vote, ValidationError> {
        let tx = Transaction::decode(raw).map_err(|_| ValidationError::BadSignature)?;
        let sender = tx.sender().map_err(|_| ValidationError::BadSignature)?;

        // Remember the body as soon as it is authenticated: peer votes for
        // this hash may already be stored, and a finality certificate can
        // only execute once the body is known. Indexing touches no account
        // field, so rejected envelopes still mutate nothing observable.
        self.index_transaction(tx.clone());
        self.process(&sender, tx.nonce);

        let account = self.accounts.get(&sender);
        if account.pending {
            return Err(ValidationError::Pending(sender));
        }
        if tx.nonce != account.nonce {
            return Err(ValidationError::NonceMismatch {
                expected: account.nonce,
                got: tx.nonce,
            });
        }

        match self.classify(&tx)? {
            TxKind::Payment => {
                if tx.nonce != account.next_unfinalised_nonce() {
                    return Err(ValidationError::NotFinalisedPrev);
                }
                if account.balance < tx.amount {
                    return Err(ValidationError::InsufficientBalance {
                        have: account.balance,
                        need: tx.amount,
                    });
                }
            }
            TxKind::Recovery { ref tip } => {
                self.validate_recovery(&sender, &tx, tip)?;
            }
        }

        // Accepted: lock the account and self-vote.
        let hash = tx.hash();
        self.accounts.get_mut(&sender).pending = true;

        let vote = Vote::signed(
            &self.keypair,
            sender.clone(),
            account.nonce,
            VotePayload::Transaction(hash),
        );
        self.votes.insert(vote.clone());
        self.outbox.push(vote.clone());
        debug!(account = %sender, nonce = account.nonce, tx = %hash, "self-vote cast");

        self.process(&sender, account.nonce);
        Ok(vote)
    }

    /// Classify an envelope under the configured mode. Classic mode has no
    /// recovery sentinel: every transaction is a payment.
    fn classify(&self, tx: &Transaction) -> Result<TxKind, ValidationError> {
        let sentinel = match self.params.mode {
            Mode::Recovery => Some(&self.params.recovery_address),
            Mode::Classic => None,
        };
        tx.kind(sentinel)
            .map_err(|_| ValidationError::InvalidRecovery(RecoveryFault::MissingTip))
    }

    /// Recovery rule: every layer's tip must be sender-signed and notarised
    /// at its own nonce, and every nonce strictly between a tip and its
    /// enclosing envelope must hold a ⊥ notarisation.
    fn validate_recovery(
        &self,
        sender: &Address,
        outer: &Transaction,
        tip: &Transaction,
    ) -> Result<(), ValidationError> {
        let notarisation = self.params.notarisation_quorum();
        let mut parent_nonce = outer.nonce;
        let mut layer = tip.clone();

        for _ in 0..crate::MAX_RECOVERY_DEPTH {
            let tip_sender = layer
                .sender()
                .map_err(|_| ValidationError::InvalidRecovery(RecoveryFault::MissingTip))?;
            if &tip_sender != sender {
                return Err(RecoveryFault::TipSenderMismatch.into());
            }

            let tip_votes =
                self.votes
                    .count_distinct(sender, layer.nonce, &VotePayload::Transaction(layer.hash()));
            if tip_votes < notarisation {
                return Err(RecoveryFault::TipNotNotarised(layer.nonce).into());
            }

            for k in layer.nonce + 1..parent_nonce {
                if self.votes.count_distinct(sender, k, &VotePayload::Bottom) < notarisation {
                    return Err(RecoveryFault::IntermediateNotBottom(k).into());
                }
            }

            match layer
                .kind(Some(&self.params.recovery_address))
                .map_err(|_| ValidationError::InvalidRecovery(RecoveryFault::MissingTip))?
            {
                TxKind::Payment => return Ok(()),
                TxKind::Recovery { tip: inner } => {
                    parent_nonce = layer.nonce;
                    layer = *inner;
                }
            }
        }
        Err(RecoveryFault::RecursionTooDeep.into())
    }

    /// Index a transaction body and any tips nested inside it.
    fn index_transaction(&mut self, tx: Transaction) {
        let mut current = tx;
        for _ in 0..=crate::MAX_RECOVERY_DEPTH {
            let next = match current.kind(Some(&self.params.recovery_address)) {
                Ok(TxKind::Recovery { ref tip }) => Some((**tip).clone()),
                _ => None,
            };
            self.tx_index.entry(current.hash()).or_insert(current);
            match next {
                Some(tip) => current = tip,
                None => break,
            }
        }
    }

    // ── Vote ingress ─────────────────────────────────────────────────────

    /// Verify and store a peer vote, then drive the certificate processor.
    ///
    /// Re-delivering an already-stored vote is a no-op.
    pub fn on_vote(&mut self, vote: Vote) -> Result<(), ValidationError> {
        vote.verify(&self.validators)?;
        let account = vote.account.clone();
        let nonce = vote.nonce;
        if self.votes.insert(vote) {
            self.process(&account, nonce);
        }
        Ok(())
    }

    /// Batched peer-vote ingress. Individual failures are reported
    /// positionally; valid votes in the batch are still applied.
    pub fn on_votes(&mut self, votes: Vec<Vote>) -> Vec<Result<(), ValidationError>> {
        votes.into_iter().map(|v| self.on_vote(v)).collect()
    }

    // ── Certificate processor ────────────────────────────────────────────

    /// Re-evaluate a slot after a vote insertion, re-entering while the
    /// account's nonce advances (votes for later nonces may already be in
    /// the store).
    fn process(&mut self, account: &Address, trigger_nonce: u64) {
        let mut nonce = trigger_nonce;
        loop {
            let before = self.accounts.get(account).nonce;
            let recheck = self.process_slot(account, nonce);
            let after = self.accounts.get(account).nonce;

            if after > before {
                nonce = after;
            } else if !recheck {
                break;
            }
        }
    }

    /// Apply the quorum rules to one `(account, nonce)` slot. Returns true
    /// when the slot must be re-evaluated without a nonce advance (a ⊥
    /// self-vote was just inserted).
    fn process_slot(&mut self, account: &Address, nonce: u64) -> bool {
        let summary = quorum::evaluate(self.votes.votes(account, nonce));
        let leader = summary.leader;
        let q = summary.leader_count();
        let acct = self.accounts.get(account);

        let finality = self.params.finality_quorum();
        let notarisation = self.params.notarisation_quorum();

        // Bottom-vote rule: enough validators voted that a quorum exists,
        // but no single payload can be notarised. Vote ⊥ to unlock.
        if self.params.mode == Mode::Recovery
            && nonce == acct.nonce
            && q < notarisation
            && summary.total_voters >= finality
            && !self.votes.has_bottom_vote(account, nonce, &self.address)
        {
            self.accounts.get_mut(account).pending = true;
            let bottom = Vote::signed(&self.keypair, account.clone(), nonce, VotePayload::Bottom);
            self.votes.insert(bottom.clone());
            self.outbox.push(bottom);
            debug!(account = %account, nonce, "no payload can reach notarisation; voting bottom");
            return true;
        }

        // Notarisation advance: some payload (transaction or ⊥) is safe to
        // move past.
        if self.params.mode == Mode::Recovery
            && nonce == acct.nonce
            && q >= notarisation
            && acct.pending
        {
            let a = self.accounts.get_mut(account);
            a.nonce = nonce + 1;
            a.pending = false;
            debug!(account = %account, nonce, "notarisation reached; nonce advanced");
        }

        // Finality execute: a transaction payload reached `n − f`.
        if q >= finality {
            if let Some((VotePayload::Transaction(hash), _)) = leader {
                let acct = self.accounts.get(account);
                if acct.finalised.map_or(true, |f| nonce > f) {
                    self.execute_finalised(account, nonce, hash);
                }
            }
        }

        false
    }

    /// Apply the effect of a finality certificate at `(account, nonce)` for
    /// the transaction `hash`.
    fn execute_finalised(&mut self, account: &Address, nonce: u64, hash: TxHash) {
        let Some(tx) = self.tx_index.get(&hash).cloned() else {
            debug!(account = %account, nonce, tx = %hash,
                "finality certificate for unknown transaction body; deferred until ingress");
            return;
        };

        let sentinel = match self.params.mode {
            Mode::Recovery => self.params.recovery_address.clone(),
            // No recovery chains exist in classic mode; the payment is its
            // own chain start and a sentinel is never matched.
            Mode::Classic => Address::recovery_sentinel(),
        };

        let orig = match chain_start(&tx, &sentinel) {
            Ok(orig) => orig,
            Err(fault) => {
                warn!(account = %account, nonce, tx = %hash, %fault,
                    "finalised payload has an unresolvable chain start; ignoring");
                return;
            }
        };

        let acct = self.accounts.get(account);
        if orig.nonce == acct.next_unfinalised_nonce() {
            self.apply_transfer(account, &orig);
            self.accounts.get_mut(account).finalised = Some(nonce);
            debug!(account = %account, nonce, tx = %hash, "payment executed and finalised");
        } else if Some(orig.nonce) == acct.finalised {
            // Tip already executed through an earlier finalisation; only the
            // finalised watermark moves.
            self.accounts.get_mut(account).finalised = Some(nonce);
            debug!(account = %account, nonce, tx = %hash, "tip already executed; finalised advanced");
        } else {
            warn!(
                account = %account, nonce, chain_start_nonce = orig.nonce,
                finalised = ?acct.finalised,
                "inconsistent chain start on finalised payload; ignoring"
            );
            return;
        }

        // Finalisation implies the nonce is past this slot.
        let a = self.accounts.get_mut(account);
        if a.nonce <= nonce {
            a.nonce = nonce + 1;
        }
        a.pending = false;
    }

    /// Debit the sender and credit the recipient for the chain-start
    /// payment. Under honest inputs the balance was checked at validation
    /// time; an uncovered debit here means adversarial votes were injected,
    /// and the transfer is skipped.
    fn apply_transfer(&mut self, sender: &Address, payment: &Transaction) {
        let amount = payment.amount;
        let sender_account = self.accounts.get_mut(sender);
        match sender_account.balance.checked_sub(amount) {
            Some(rest) => {
                sender_account.balance = rest;
                let recipient = self.accounts.get_mut(&payment.recipient);
                recipient.balance = recipient.balance.saturating_add(amount);
            }
            None => {
                warn!(account = %sender, %amount, "finalised transfer exceeds balance; skipped");
            }
        }
    }

    // ── Recovery-info snapshots ──────────────────────────────────────────

    /// Assemble the evidence a client needs to craft a recovery transaction
    /// for `account`.
    pub fn recovery_info(&self, account: &Address) -> Result<RecoveryInfo, SnapshotError> {
        let acct = self.accounts.get(account);
        let finality = self.params.finality_quorum();
        let notarisation = self.params.notarisation_quorum();

        let (finalised_tx, finality_certificate) = match acct.finalised {
            Some(f) => {
                // The finalised slot may also hold ⊥ votes; the certificate
                // of record is the transaction one.
                let tx_votes: Vec<Vote> = self
                    .votes
                    .votes(account, f)
                    .iter()
                    .filter(|v| !v.payload.is_bottom())
                    .cloned()
                    .collect();
                let cert = quorum::leading_certificate(&tx_votes, finality)
                    .ok_or(SnapshotError::MissingNotarisation(f))?;
                (cert.payload.tx_hash(), Some(cert))
            }
            None => (None, None),
        };

        let start = acct.finalised.map_or(0, |f| f + 1);
        let mut chain = Vec::new();
        for k in start..acct.nonce {
            let cert = quorum::leading_certificate(self.votes.votes(account, k), notarisation)
                .ok_or(SnapshotError::MissingNotarisation(k))?;
            chain.push(cert);
        }

        Ok(RecoveryInfo {
            finalised_nonce: acct.finalised,
            finalised_tx,
            finality_certificate,
            current_nonce: acct.nonce,
            chain,
        })
    }
}
