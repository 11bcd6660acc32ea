// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Account management.
//!
//! An [`Account`] owns its balance, active flag and transaction history. The
//! only write paths are [`Account::deposit`], [`Account::withdraw`] and
//! [`Account::close`], each of which checks its guards before touching state:
//!
//! ```text
//!  Active ──deposit / withdraw──► Active
//!    │
//!    └──close (balance == 0)──► Closed (terminal)
//! ```
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use guarded_ledger::Account;
//!
//! let account = Account::new("001", dec!(1000)).unwrap();
//! assert!(!account.withdraw(dec!(2000)));
//! assert!(account.deposit(dec!(500)));
//! assert_eq!(account.balance(), dec!(1500));
//! ```

use crate::base::AccountNumber;
use crate::error::{InvalidArgument, OperationRejected};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{info, warn};

/// Mutable account state, always accessed under the account lock.
#[derive(Debug)]
struct AccountData {
    balance: Decimal,
    active: bool,
    /// One entry per successful deposit or withdrawal, in order.
    history: Vec<String>,
}

impl AccountData {
    fn new(initial_balance: Decimal) -> Self {
        Self {
            balance: initial_balance,
            active: true,
            history: Vec::new(),
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
    }

    /// Increases the balance.
    fn deposit(&mut self, amount: Decimal) -> Result<(), OperationRejected> {
        if !self.active {
            return Err(OperationRejected::AccountInactive);
        }
        if amount <= Decimal::ZERO {
            return Err(OperationRejected::InvalidAmount);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(OperationRejected::BalanceOverflow)?;
        self.history.push(format!("Deposit: {amount}"));
        self.assert_invariants();
        Ok(())
    }

    /// Decreases the balance.
    fn withdraw(&mut self, amount: Decimal) -> Result<(), OperationRejected> {
        if !self.active {
            return Err(OperationRejected::AccountInactive);
        }
        if amount <= Decimal::ZERO {
            return Err(OperationRejected::InvalidAmount);
        }
        if amount > self.balance {
            return Err(OperationRejected::InsufficientFunds);
        }
        self.balance -= amount;
        self.history.push(format!("Withdrawal: {amount}"));
        self.assert_invariants();
        Ok(())
    }

    /// Clears the active flag. Irreversible.
    fn close(&mut self) -> Result<(), OperationRejected> {
        if self.balance > Decimal::ZERO {
            return Err(OperationRejected::OutstandingBalance);
        }
        self.active = false;
        Ok(())
    }
}

/// Ledger account.
///
/// All mutable state sits behind a single lock, so every operation's
/// check-then-write sequence is atomic and the account can be shared across
/// threads behind an `Arc`.
#[derive(Debug)]
pub struct Account {
    account_number: AccountNumber,
    inner: Mutex<AccountData>,
}

impl Account {
    const DECIMAL_PRECISION: u32 = 4;

    /// Opens an active account.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgument::NegativeInitialBalance`] - `initial_balance` is below zero.
    /// - [`InvalidArgument::EmptyAccountNumber`] - `account_number` is empty.
    pub fn new(
        account_number: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Self, InvalidArgument> {
        let account_number = account_number.into();
        if initial_balance < Decimal::ZERO {
            return Err(InvalidArgument::NegativeInitialBalance);
        }
        if account_number.is_empty() {
            return Err(InvalidArgument::EmptyAccountNumber);
        }

        Ok(Self {
            account_number: AccountNumber::new(account_number),
            inner: Mutex::new(AccountData::new(initial_balance)),
        })
    }

    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().active
    }

    /// Returns a copy of the transaction history, oldest first.
    pub fn transaction_history(&self) -> Vec<String> {
        self.inner.lock().history.clone()
    }

    /// Credits `amount`, returning `false` when the deposit is rejected.
    pub fn deposit(&self, amount: Decimal) -> bool {
        self.try_deposit(amount)
            .inspect_err(|reason| {
                warn!(account = %self.account_number, %amount, %reason, "deposit rejected")
            })
            .is_ok()
    }

    /// Debits `amount`, returning `false` when the withdrawal is rejected.
    pub fn withdraw(&self, amount: Decimal) -> bool {
        self.try_withdraw(amount)
            .inspect_err(|reason| {
                warn!(account = %self.account_number, %amount, %reason, "withdrawal rejected")
            })
            .is_ok()
    }

    /// Closes the account, returning `false` while funds remain.
    pub fn close(&self) -> bool {
        self.try_close()
            .inspect_err(|reason| warn!(account = %self.account_number, %reason, "close rejected"))
            .is_ok()
    }

    /// Credits `amount`.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`OperationRejected::AccountInactive`] - account is closed.
    /// - [`OperationRejected::InvalidAmount`] - `amount` is zero or negative.
    /// - [`OperationRejected::BalanceOverflow`] - the new balance would exceed [`Decimal::MAX`].
    pub fn try_deposit(&self, amount: Decimal) -> Result<(), OperationRejected> {
        let mut data = self.inner.lock();
        data.deposit(amount)?;
        info!(account = %self.account_number, %amount, balance = %data.balance, "deposit applied");
        Ok(())
    }

    /// Debits `amount`.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`OperationRejected::AccountInactive`] - account is closed.
    /// - [`OperationRejected::InvalidAmount`] - `amount` is zero or negative.
    /// - [`OperationRejected::InsufficientFunds`] - `amount` exceeds the balance.
    pub fn try_withdraw(&self, amount: Decimal) -> Result<(), OperationRejected> {
        let mut data = self.inner.lock();
        data.withdraw(amount)?;
        info!(account = %self.account_number, %amount, balance = %data.balance, "withdrawal applied");
        Ok(())
    }

    /// Closes the account. Closing a closed account is a no-op success.
    ///
    /// # Errors
    ///
    /// [`OperationRejected::OutstandingBalance`] if the balance is above zero.
    pub fn try_close(&self) -> Result<(), OperationRejected> {
        self.inner.lock().close()?;
        info!(account = %self.account_number, "account closed");
        Ok(())
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.inner.lock();
        let mut state = serializer.serialize_struct("Account", 4)?;
        state.serialize_field("account", &self.account_number)?;
        state.serialize_field(
            "balance",
            &data.balance.round_dp(Account::DECIMAL_PRECISION),
        )?;
        state.serialize_field("active", &data.active)?;
        state.serialize_field("transactions", &data.history.len())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // === AccountData Internal Tests ===

    #[test]
    fn account_data_records_history_in_order() {
        let mut data = AccountData::new(dec!(10));
        data.deposit(dec!(5)).unwrap();
        data.withdraw(dec!(3.25)).unwrap();
        assert_eq!(data.history, vec!["Deposit: 5", "Withdrawal: 3.25"]);
        assert_eq!(data.balance, dec!(11.75));
    }

    #[test]
    fn inactive_check_precedes_amount_check() {
        let mut data = AccountData::new(Decimal::ZERO);
        data.close().unwrap();
        assert_eq!(data.deposit(dec!(-1)), Err(OperationRejected::AccountInactive));
        assert_eq!(data.withdraw(dec!(0)), Err(OperationRejected::AccountInactive));
    }

    #[test]
    fn amount_check_precedes_funds_check() {
        let mut data = AccountData::new(Decimal::ZERO);
        assert_eq!(data.withdraw(dec!(-5)), Err(OperationRejected::InvalidAmount));
        assert_eq!(data.withdraw(dec!(5)), Err(OperationRejected::InsufficientFunds));
    }

    #[test]
    fn overflowing_deposit_is_rejected() {
        let mut data = AccountData::new(Decimal::MAX);
        assert_eq!(data.deposit(Decimal::ONE), Err(OperationRejected::BalanceOverflow));
        assert_eq!(data.balance, Decimal::MAX);
        assert!(data.history.is_empty());
    }

    #[test]
    fn close_with_funds_keeps_account_active() {
        let mut data = AccountData::new(dec!(0.01));
        assert_eq!(data.close(), Err(OperationRejected::OutstandingBalance));
        assert!(data.active);
    }

    #[test]
    fn rejected_operations_leave_history_untouched() {
        let mut data = AccountData::new(dec!(10));
        let _ = data.deposit(Decimal::ZERO);
        let _ = data.withdraw(dec!(11));
        assert!(data.history.is_empty());
        assert_eq!(data.balance, dec!(10));
    }

    #[test]
    fn account_number_is_checked_after_balance() {
        let result = Account::new("", dec!(-1));
        assert_eq!(result.unwrap_err(), InvalidArgument::NegativeInitialBalance);
    }

    // === Serialization Tests ===

    #[test]
    fn serializer_rounds_to_four_decimal_places() {
        let account = Account::new("001", Decimal::ZERO).unwrap();

        {
            let mut data = account.inner.lock();
            // 123.456789 should round to 123.4568
            data.balance = dec!(123.456789);
        }

        let json = serde_json::to_string(&account).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["balance"].as_str().unwrap(), "123.4568");
    }

    #[test]
    fn serializer_writes_snapshot_fields() {
        let account = Account::new("acc-42", dec!(100.1234)).unwrap();
        account.deposit(dec!(50.5678));

        let json = serde_json::to_string(&account).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["account"], "acc-42");
        assert_eq!(parsed["balance"].as_str().unwrap(), "150.6912");
        assert_eq!(parsed["active"], true);
        assert_eq!(parsed["transactions"], 1);
    }

    #[test]
    fn serializer_uses_bankers_rounding() {
        let account = Account::new("001", dec!(0.00015)).unwrap();

        let json = serde_json::to_string(&account).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        // 0.00015 rounds half to even
        assert_eq!(parsed["balance"].as_str().unwrap(), "0.0002");
    }

    #[test]
    fn serializer_precision_constant_is_four() {
        assert_eq!(Account::DECIMAL_PRECISION, 4);
    }
}
