//! # Account Registry
//!
//! Known accounts in insertion order, plus the current selection.
//! Identity and selection only; refresh side effects live in
//! [`InspectorState`](super::state::InspectorState).

use super::errors::{InspectorError, InspectorResult};
use super::hex::Address;
use tracing::debug;

/// Registry of accounts seen during this session.
#[derive(Debug, Default, Clone)]
pub struct AccountRegistry {
    accounts: Vec<Address>,
    selected: Option<usize>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize, insert if new, and select.
    ///
    /// Registering a known address only changes the selection. On
    /// `InvalidAddress` the registry is left untouched.
    pub fn register(&mut self, input: &str) -> InspectorResult<Address> {
        let address = Address::parse(input)?;
        let index = match self.position(&address) {
            Some(index) => index,
            None => {
                self.accounts.push(address.clone());
                debug!(address = %address, total = self.accounts.len(), "Account registered");
                self.accounts.len() - 1
            }
        };
        self.selected = Some(index);
        Ok(address)
    }

    /// Select a previously registered account.
    pub fn select(&mut self, address: &Address) -> InspectorResult<()> {
        let index = self
            .position(address)
            .ok_or_else(|| InspectorError::UnknownAccount(address.to_string()))?;
        self.selected = Some(index);
        Ok(())
    }

    /// Accounts in registration order.
    pub fn list(&self) -> &[Address] {
        &self.accounts
    }

    pub fn selected(&self) -> Option<&Address> {
        self.selected.and_then(|i| self.accounts.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_selected(&self, address: &Address) -> bool {
        self.selected() == Some(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.position(address).is_some()
    }

    pub fn position(&self, address: &Address) -> Option<usize> {
        self.accounts.iter().position(|a| a == address)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
