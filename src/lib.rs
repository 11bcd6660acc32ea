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

//! # Guarded Ledger
//!
//! This library provides an invariant-guarded account ledger together with
//! service objects that receive their notification channel or persistence
//! backend from the caller instead of constructing one themselves.
//!
//! ## Core Components
//!
//! - [`Account`]: Account with balance, active flag and transaction history
//! - [`NotificationService`]: Sends messages through any [`Notifier`]
//! - [`OrderService`], [`UserService`]: Store data through any [`Database`]
//! - [`InvalidArgument`], [`OperationRejected`]: Error types for account failures
//!
//! ## Example
//!
//! ```
//! use guarded_ledger::{Account, EmailNotifier, NotificationService};
//! use rust_decimal_macros::dec;
//!
//! let account = Account::new("001", dec!(1000)).unwrap();
//! assert!(!account.withdraw(dec!(2000)));
//! assert!(account.deposit(dec!(500)));
//! assert!(account.withdraw(dec!(300)));
//! assert_eq!(account.balance(), dec!(1200));
//! assert_eq!(account.transaction_history().len(), 2);
//!
//! let notifications = NotificationService::new(EmailNotifier);
//! let receipt = notifications.send("balance updated").unwrap();
//! assert_eq!(receipt, "Sending email: balance updated");
//! ```
//!
//! ## Thread Safety
//!
//! Each account serializes its operations behind its own lock, so an account
//! can be shared between threads. Accounts never coordinate with each other.

pub mod account;
mod base;
pub mod error;
pub mod notification;
pub mod persistence;

pub use account::Account;
pub use base::{AccountNumber, OrderId};
pub use error::{InvalidArgument, OperationRejected};
pub use notification::{EmailNotifier, NotificationService, Notifier, SmsNotifier};
pub use persistence::{
    Database, MongoDatabase, MySqlDatabase, OrderService, PostgresDatabase, User, UserService,
};
