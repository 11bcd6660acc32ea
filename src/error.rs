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

//! Error types for account construction and account operations.

use thiserror::Error;

/// Construction-time failures. The account is never created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    /// Initial balance is below zero
    #[error("initial balance cannot be negative")]
    NegativeInitialBalance,

    /// Account number is the empty string
    #[error("account number cannot be empty")]
    EmptyAccountNumber,
}

/// Operational rejections. The account is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationRejected {
    /// Account has been closed
    #[error("account is inactive")]
    AccountInactive,

    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Withdrawal would exceed the balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Deposit would push the balance past the largest representable amount
    #[error("balance would overflow")]
    BalanceOverflow,

    /// Close attempted while funds remain
    #[error("balance must be zero before closing the account")]
    OutstandingBalance,
}
