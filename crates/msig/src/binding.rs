//! The multisig wallet contract interface.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, sol};
use std::fmt;

sol! {
    /// The read and write surface of the multisig wallet contract.
    #[sol(rpc)]
    #[derive(Debug)]
    interface IMultiSigWallet {
        function submitTransaction(address _to, uint256 _value, bytes _data) external;
        function confirmTransaction(uint256 _txIndex) external;
        function revokeConfirmation(uint256 _txIndex) external;
        function executeTransaction(uint256 _txIndex) external;

        function getTransaction(uint256 _txIndex)
            external
            view
            returns (address to, uint256 value, bytes data, bool executed, uint256 numConfirmations);
        function getTransactionCount() external view returns (uint256);
        function getOwnerCount() external view returns (uint256);
        function owners(uint256 index) external view returns (address);
        function isOwner(address account) external view returns (bool);
        function isConfirmed(uint256 txIndex, address owner) external view returns (bool);
        function requiredConfirmations() external view returns (uint256);
    }
}

/// One of the four state-changing calls an owner can make.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultisigCall {
    /// Proposes a new transaction.
    Submit { to: Address, value: U256, data: Bytes },
    /// Approves a pending transaction.
    Confirm(u64),
    /// Withdraws an approval.
    Revoke(u64),
    /// Executes a transaction that reached the threshold.
    Execute(u64),
}

impl MultisigCall {
    /// ABI encoded calldata.
    pub fn calldata(&self) -> Bytes {
        match self {
            Self::Submit { to, value, data } => IMultiSigWallet::submitTransactionCall {
                _to: *to,
                _value: *value,
                _data: data.clone(),
            }
            .abi_encode(),
            Self::Confirm(index) => {
                IMultiSigWallet::confirmTransactionCall { _txIndex: U256::from(*index) }
                    .abi_encode()
            }
            Self::Revoke(index) => {
                IMultiSigWallet::revokeConfirmationCall { _txIndex: U256::from(*index) }
                    .abi_encode()
            }
            Self::Execute(index) => {
                IMultiSigWallet::executeTransactionCall { _txIndex: U256::from(*index) }
                    .abi_encode()
            }
        }
        .into()
    }

    /// The transaction this call acts on, `None` for a submission.
    pub fn index(&self) -> Option<u64> {
        match self {
            Self::Submit { .. } => None,
            Self::Confirm(index) | Self::Revoke(index) | Self::Execute(index) => Some(*index),
        }
    }

    /// Human readable label, e.g. for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "Submit",
            Self::Confirm(_) => "Approve",
            Self::Revoke(_) => "Revoke",
            Self::Execute(_) => "Execute",
        }
    }

    /// The past tense used once the call was included.
    pub fn done(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "Transaction submitted successfully!",
            Self::Confirm(_) => "Transaction confirmed successfully!",
            Self::Revoke(_) => "Confirmation revoked successfully!",
            Self::Execute(_) => "Transaction executed successfully!",
        }
    }
}

impl fmt::Display for MultisigCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submit { to, value, data } => {
                write!(f, "submitTransaction({to}, {value}, {data})")
            }
            Self::Confirm(index) => write!(f, "confirmTransaction({index})"),
            Self::Revoke(index) => write!(f, "revokeConfirmation({index})"),
            Self::Execute(index) => write!(f, "executeTransaction({index})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};

    #[test]
    fn selectors() {
        assert_eq!(IMultiSigWallet::confirmTransactionCall::SELECTOR, hex!("c01a8c84"));
        assert_eq!(IMultiSigWallet::submitTransactionCall::SELECTOR, hex!("c6427474"));
    }

    #[test]
    fn encodes_confirm() {
        let data = MultisigCall::Confirm(3).calldata();
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[..4], &hex!("c01a8c84"));
        assert_eq!(data[35], 3);
    }

    #[test]
    fn encodes_submit() {
        let call = MultisigCall::Submit {
            to: address!("00000000000000000000000000000000000000aa"),
            value: U256::from(1_000u64),
            data: Bytes::new(),
        };
        let data = call.calldata();
        // selector, to, value, offset, length
        assert_eq!(data.len(), 4 + 4 * 32);
        assert_eq!(&data[..4], &hex!("c6427474"));
        assert_eq!(data[35], 0xaa);
        assert_eq!(call.index(), None);
        assert_eq!(call.label(), "Submit");
    }

    #[test]
    fn labels() {
        assert_eq!(MultisigCall::Confirm(1).label(), "Approve");
        assert_eq!(MultisigCall::Execute(7).index(), Some(7));
        assert_eq!(MultisigCall::Revoke(2).to_string(), "revokeConfirmation(2)");
    }
}
