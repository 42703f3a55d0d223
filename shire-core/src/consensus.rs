//! Script verification contract shared with the consensus library.
//!
//! This module only fixes the wire-level surface: the API version, the
//! error numbering and the verification flag bits. Verification itself is
//! provided by whatever implements [`ScriptVerifier`].
//!
//! Error codes and flag bits are part of a shipped ABI. Never renumber them.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::Amount;

pub const API_VERSION: u32 = 1;

/// Error/status codes reported through the `err` out-parameter.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub enum ConsensusError {
    #[error("ok")]
    Ok = 0,
    #[error("input index out of range")]
    TxIndex = 1,
    #[error("transaction size does not match serialized length")]
    TxSizeMismatch = 2,
    #[error("transaction failed to deserialize")]
    TxDeserialize = 3,
    #[error("amount required for witness verification")]
    AmountRequired = 4,
    #[error("unknown verification flags")]
    InvalidFlags = 5,
}

impl ConsensusError {
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ConsensusError {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ConsensusError::Ok),
            1 => Ok(ConsensusError::TxIndex),
            2 => Ok(ConsensusError::TxSizeMismatch),
            3 => Ok(ConsensusError::TxDeserialize),
            4 => Ok(ConsensusError::AmountRequired),
            5 => Ok(ConsensusError::InvalidFlags),
            other => Err(other),
        }
    }
}

/// OR-able set of script verification rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct VerifyFlags(u32);

impl VerifyFlags {
    pub const NONE: Self = Self(0);
    /// Evaluate P2SH (BIP16) subscripts.
    pub const P2SH: Self = Self(1 << 0);
    /// Enforce strict DER (BIP66) signatures.
    pub const DERSIG: Self = Self(1 << 2);
    /// Enforce NULLDUMMY (BIP147).
    pub const NULLDUMMY: Self = Self(1 << 4);
    /// Enable CHECKLOCKTIMEVERIFY (BIP65).
    pub const CHECKLOCKTIMEVERIFY: Self = Self(1 << 9);
    /// Enable CHECKSEQUENCEVERIFY (BIP112).
    pub const CHECKSEQUENCEVERIFY: Self = Self(1 << 10);
    /// Enable segregated witness (BIP141).
    pub const WITNESS: Self = Self(1 << 11);
    pub const ALL: Self = Self(
        Self::P2SH.0
            | Self::DERSIG.0
            | Self::NULLDUMMY.0
            | Self::CHECKLOCKTIMEVERIFY.0
            | Self::CHECKSEQUENCEVERIFY.0
            | Self::WITNESS.0,
    );

    const NAMED: [(&'static str, Self); 6] = [
        ("P2SH", Self::P2SH),
        ("DERSIG", Self::DERSIG),
        ("NULLDUMMY", Self::NULLDUMMY),
        ("CHECKLOCKTIMEVERIFY", Self::CHECKLOCKTIMEVERIFY),
        ("CHECKSEQUENCEVERIFY", Self::CHECKSEQUENCEVERIFY),
        ("WITNESS", Self::WITNESS),
    ];

    /// Accepts only words made of known flag bits.
    pub const fn from_bits(bits: u32) -> Result<Self, ConsensusError> {
        if bits & !Self::ALL.0 != 0 {
            return Err(ConsensusError::InvalidFlags);
        }
        Ok(Self(bits))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Names of the set flags, lowest bit first.
    pub fn iter_names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| name)
    }
}

impl TryFrom<u32> for VerifyFlags {
    type Error = ConsensusError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<VerifyFlags> for u32 {
    fn from(flags: VerifyFlags) -> Self {
        flags.0
    }
}

impl BitOr for VerifyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for VerifyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for VerifyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let names: Vec<&str> = self.iter_names().collect();
        f.write_str(&names.join("|"))
    }
}

/// Entry points exported by a consensus library.
///
/// `n_in` is the index of the input of `tx_to` spending `script_pubkey`.
pub trait ScriptVerifier {
    fn verify_script(
        &self,
        script_pubkey: &[u8],
        tx_to: &[u8],
        n_in: u32,
        flags: VerifyFlags,
    ) -> Result<(), ConsensusError>;

    fn verify_script_with_amount(
        &self,
        script_pubkey: &[u8],
        amount: Amount,
        tx_to: &[u8],
        n_in: u32,
        flags: VerifyFlags,
    ) -> Result<(), ConsensusError>;

    fn version(&self) -> u32 {
        API_VERSION
    }
}

/// Express a verification result as the C pair: `1`/`0` plus error code.
pub fn into_abi(result: Result<(), ConsensusError>) -> (i32, ConsensusError) {
    match result {
        Ok(()) => (1, ConsensusError::Ok),
        Err(err) => (0, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RejectWitnessWithoutAmount;

    impl ScriptVerifier for RejectWitnessWithoutAmount {
        fn verify_script(
            &self,
            _script_pubkey: &[u8],
            tx_to: &[u8],
            _n_in: u32,
            flags: VerifyFlags,
        ) -> Result<(), ConsensusError> {
            if flags.contains(VerifyFlags::WITNESS) {
                return Err(ConsensusError::AmountRequired);
            }
            if tx_to.is_empty() {
                return Err(ConsensusError::TxDeserialize);
            }
            Ok(())
        }

        fn verify_script_with_amount(
            &self,
            _script_pubkey: &[u8],
            _amount: Amount,
            tx_to: &[u8],
            _n_in: u32,
            _flags: VerifyFlags,
        ) -> Result<(), ConsensusError> {
            if tx_to.is_empty() {
                return Err(ConsensusError::TxDeserialize);
            }
            Ok(())
        }
    }

    #[test]
    fn error_codes_are_fixed() {
        assert_eq!(ConsensusError::Ok.code(), 0);
        assert_eq!(ConsensusError::TxIndex.code(), 1);
        assert_eq!(ConsensusError::TxSizeMismatch.code(), 2);
        assert_eq!(ConsensusError::TxDeserialize.code(), 3);
        assert_eq!(ConsensusError::AmountRequired.code(), 4);
        assert_eq!(ConsensusError::InvalidFlags.code(), 5);
        for code in 0..=5 {
            assert_eq!(ConsensusError::try_from(code).map(|e| e.code()), Ok(code));
        }
        assert_eq!(ConsensusError::try_from(6), Err(6));
    }

    #[test]
    fn flag_bits_are_fixed() {
        assert_eq!(VerifyFlags::NONE.bits(), 0);
        assert_eq!(VerifyFlags::P2SH.bits(), 0x001);
        assert_eq!(VerifyFlags::DERSIG.bits(), 0x004);
        assert_eq!(VerifyFlags::NULLDUMMY.bits(), 0x010);
        assert_eq!(VerifyFlags::CHECKLOCKTIMEVERIFY.bits(), 0x200);
        assert_eq!(VerifyFlags::CHECKSEQUENCEVERIFY.bits(), 0x400);
        assert_eq!(VerifyFlags::WITNESS.bits(), 0x800);
        assert_eq!(VerifyFlags::ALL.bits(), 0xE15);
    }

    #[test]
    fn all_is_union_of_named_flags() {
        let mut union = VerifyFlags::NONE;
        for (_, flag) in VerifyFlags::NAMED {
            union |= flag;
        }
        assert_eq!(union, VerifyFlags::ALL);
    }

    #[test]
    fn from_bits_rejects_unknown_bits() {
        assert_eq!(VerifyFlags::from_bits(0xE15), Ok(VerifyFlags::ALL));
        assert_eq!(VerifyFlags::from_bits(0), Ok(VerifyFlags::NONE));
        assert_eq!(
            VerifyFlags::from_bits(1 << 1),
            Err(ConsensusError::InvalidFlags)
        );
        assert_eq!(
            VerifyFlags::from_bits(u32::MAX),
            Err(ConsensusError::InvalidFlags)
        );
    }

    #[test]
    fn display_lists_flag_names() {
        assert_eq!(VerifyFlags::NONE.to_string(), "NONE");
        assert_eq!(
            (VerifyFlags::P2SH | VerifyFlags::WITNESS).to_string(),
            "P2SH|WITNESS"
        );
    }

    #[test]
    fn verifier_results_map_to_abi_pair() {
        let verifier = RejectWitnessWithoutAmount;
        assert_eq!(verifier.version(), API_VERSION);
        assert_eq!(
            into_abi(verifier.verify_script(&[], &[1], 0, VerifyFlags::P2SH)),
            (1, ConsensusError::Ok)
        );
        assert_eq!(
            into_abi(verifier.verify_script(&[], &[1], 0, VerifyFlags::ALL)),
            (0, ConsensusError::AmountRequired)
        );
        assert_eq!(
            into_abi(verifier.verify_script_with_amount(&[], 5, &[], 0, VerifyFlags::ALL)),
            (0, ConsensusError::TxDeserialize)
        );
    }
}
