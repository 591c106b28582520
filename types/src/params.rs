//! Protocol parameters.
//!
//! The protocol is defined by the Byzantine budget `f` and the validator
//! count `n`. Everything else (the two quorum sizes and the recovery
//! sentinel) is derived. Parameters are resolved once at startup and never
//! change for the lifetime of the process.

use crate::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which quorum rule the certificate processor runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The 5f+1 protocol: notarisation and finality quorums, bottom votes,
    /// recovery transactions.
    #[default]
    Recovery,
    /// The classic 3f+1 comparison variant: a single finality quorum, no
    /// bottom votes, no recovery. A split below quorum locks the account.
    Classic,
}

/// Errors raised while validating startup parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("fault budget f must be positive")]
    ZeroFaultBudget,

    #[error("validator count {n} is below the required minimum {min} for {mode:?} mode")]
    TooFewValidators { n: usize, min: usize, mode: Mode },
}

/// Process-wide protocol configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Byzantine budget: the maximum number of validators that may deviate
    /// arbitrarily from the protocol.
    pub fault_budget: usize,

    /// Total validator count. Must satisfy `n >= 5f + 1` in recovery mode,
    /// `n >= 3f + 1` in classic mode.
    pub validator_count: usize,

    /// Quorum rule variant.
    #[serde(default)]
    pub mode: Mode,

    /// Sentinel recipient marking recovery transactions.
    #[serde(default = "Address::recovery_sentinel")]
    pub recovery_address: Address,
}

impl ProtocolParams {
    pub fn new(fault_budget: usize, validator_count: usize, mode: Mode) -> Self {
        Self {
            fault_budget,
            validator_count,
            mode,
            recovery_address: Address::recovery_sentinel(),
        }
    }

    /// Votes needed for a finality certificate: `n - f`.
    pub fn finality_quorum(&self) -> usize {
        self.validator_count - self.fault_budget
    }

    /// Votes needed for a notarisation certificate: `n - 3f`.
    pub fn notarisation_quorum(&self) -> usize {
        self.validator_count.saturating_sub(3 * self.fault_budget)
    }

    /// Check the fault-model precondition for the configured mode.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.fault_budget == 0 {
            return Err(ParamsError::ZeroFaultBudget);
        }
        let min = match self.mode {
            Mode::Recovery => 5 * self.fault_budget + 1,
            Mode::Classic => 3 * self.fault_budget + 1,
        };
        if self.validator_count < min {
            return Err(ParamsError::TooFewValidators {
                n: self.validator_count,
                min,
                mode: self.mode,
            });
        }
        Ok(())
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self::new(1, 6, Mode::Recovery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        let p = ProtocolParams::default();
        assert_eq!(p.validate(), Ok(()));
        assert_eq!(p.finality_quorum(), 5);
        assert_eq!(p.notarisation_quorum(), 3);
    }

    #[test]
    fn recovery_mode_requires_5f_plus_1() {
        let p = ProtocolParams::new(1, 5, Mode::Recovery);
        assert_eq!(
            p.validate(),
            Err(ParamsError::TooFewValidators {
                n: 5,
                min: 6,
                mode: Mode::Recovery
            })
        );
    }

    #[test]
    fn classic_mode_requires_3f_plus_1() {
        assert!(ProtocolParams::new(1, 4, Mode::Classic).validate().is_ok());
        assert!(ProtocolParams::new(1, 3, Mode::Classic).validate().is_err());
    }

    #[test]
    fn zero_fault_budget_rejected() {
        let p = ProtocolParams::new(0, 6, Mode::Recovery);
        assert_eq!(p.validate(), Err(ParamsError::ZeroFaultBudget));
    }

    #[test]
    fn quorums_scale_with_f() {
        let p = ProtocolParams::new(2, 11, Mode::Recovery);
        assert!(p.validate().is_ok());
        assert_eq!(p.finality_quorum(), 9);
        assert_eq!(p.notarisation_quorum(), 5);
    }
}
