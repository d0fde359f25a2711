//! Unsigned transaction model.
//!
//! A [`WireTransaction`] is immutable once built. Its id is the BLAKE3 digest
//! of its canonical encoding, and every signature in the system is made over
//! that id.

use super::encoding::CanonicalWriter;
use super::obligation::ObligationRecord;
use serde::{Deserialize, Serialize};
use shared_crypto::blake3_hash;
use shared_types::{Party, PublicKey, SecureHash};
use std::collections::BTreeSet;

const WIRE_TX_DOMAIN: &str = "iou-ledger/wire-transaction/v1";

/// Reference to an output of an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateRef {
    pub tx_id: SecureHash,
    pub index: u32,
}

impl StateRef {
    pub fn new(tx_id: SecureHash, index: u32) -> Self {
        Self { tx_id, index }
    }
}

impl std::fmt::Display for StateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.tx_id.short(), self.index)
    }
}

/// A state produced by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractState {
    /// An IOU governed by the issuance contract.
    Obligation(ObligationRecord),
    /// A state owned by some other contract, carried as raw bytes.
    Opaque { contract: String, data: Vec<u8> },
}

impl ContractState {
    /// Identifier of the contract governing this state.
    #[must_use]
    pub fn contract_id(&self) -> &str {
        match self {
            Self::Obligation(_) => crate::IOU_CONTRACT_ID,
            Self::Opaque { contract, .. } => contract,
        }
    }

    #[must_use]
    pub fn as_obligation(&self) -> Option<&ObligationRecord> {
        match self {
            Self::Obligation(record) => Some(record),
            Self::Opaque { .. } => None,
        }
    }

    fn encode(&self, w: &mut CanonicalWriter) {
        match self {
            Self::Obligation(record) => {
                w.put_u8(0);
                w.put_i64(record.amount.quantity);
                w.put_str(&record.amount.token);
                w.put_party(&record.lender);
                w.put_party(&record.borrower);
                w.put_fixed(record.linear_id.as_bytes());
            }
            Self::Opaque { contract, data } => {
                w.put_u8(1);
                w.put_str(contract);
                w.put_bytes(data);
            }
        }
    }
}

/// Closed set of command intents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Create a new IOU.
    Issue,
    /// A command addressed to some other contract.
    Other(String),
}

/// An intent plus the keys that must sign for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub signers: BTreeSet<PublicKey>,
}

impl Command {
    pub fn new(kind: CommandKind, signers: impl IntoIterator<Item = PublicKey>) -> Self {
        Self {
            kind,
            signers: signers.into_iter().collect(),
        }
    }

    /// Issue command signed by the given keys.
    pub fn issue(signers: impl IntoIterator<Item = PublicKey>) -> Self {
        Self::new(CommandKind::Issue, signers)
    }

    fn encode(&self, w: &mut CanonicalWriter) {
        match &self.kind {
            CommandKind::Issue => w.put_u8(0),
            CommandKind::Other(name) => {
                w.put_u8(1);
                w.put_str(name);
            }
        }
        w.put_len(self.signers.len());
        for key in &self.signers {
            w.put_fixed(key);
        }
    }
}

/// Proposed ledger transition, before any signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTransaction {
    pub inputs: Vec<StateRef>,
    pub outputs: Vec<ContractState>,
    pub commands: Vec<Command>,
    pub notary: Party,
}

impl WireTransaction {
    /// Canonical encoding committing to every field.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut w = CanonicalWriter::new(WIRE_TX_DOMAIN);

        w.put_len(self.inputs.len());
        for input in &self.inputs {
            w.put_fixed(input.tx_id.as_bytes());
            w.put_u32(input.index);
        }

        w.put_len(self.outputs.len());
        for output in &self.outputs {
            output.encode(&mut w);
        }

        w.put_len(self.commands.len());
        for command in &self.commands {
            command.encode(&mut w);
        }

        w.put_party(&self.notary);
        w.finish()
    }

    /// Content-derived transaction id.
    #[must_use]
    pub fn id(&self) -> SecureHash {
        SecureHash::new(blake3_hash(&self.canonical_bytes()))
    }

    /// Union of every command's signers.
    #[must_use]
    pub fn required_signing_keys(&self) -> BTreeSet<PublicKey> {
        self.commands
            .iter()
            .flat_map(|command| command.signers.iter().copied())
            .collect()
    }

    /// Outputs that are IOUs, in output order.
    pub fn obligation_outputs(&self) -> impl Iterator<Item = &ObligationRecord> {
        self.outputs.iter().filter_map(ContractState::as_obligation)
    }

    /// Commands of the given kind, in command order.
    pub fn commands_of_kind<'a>(
        &'a self,
        kind: &'a CommandKind,
    ) -> impl Iterator<Item = &'a Command> + 'a {
        self.commands.iter().filter(move |c| &c.kind == kind)
    }
}

/// Incrementally assembles a [`WireTransaction`].
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    notary: Party,
    inputs: Vec<StateRef>,
    outputs: Vec<ContractState>,
    commands: Vec<Command>,
}

impl TransactionBuilder {
    pub fn new(notary: Party) -> Self {
        Self {
            notary,
            inputs: Vec::new(),
            outputs: Vec::new(),
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_input(mut self, input: StateRef) -> Self {
        self.inputs.push(input);
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: ContractState) -> Self {
        self.outputs.push(output);
        self
    }

    #[must_use]
    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Freeze the builder into an immutable transaction.
    #[must_use]
    pub fn to_wire_transaction(&self) -> WireTransaction {
        WireTransaction {
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            commands: self.commands.clone(),
            notary: self.notary.clone(),
        }
    }

    /// Build and run contract verification against the result.
    pub fn verify(&self) -> Result<WireTransaction, crate::ContractViolation> {
        let tx = self.to_wire_transaction();
        crate::verify_transaction(&tx)?;
        Ok(tx)
    }
}
