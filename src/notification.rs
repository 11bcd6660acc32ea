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

//! Notification delivery.
//!
//! [`NotificationService`] depends only on the [`Notifier`] capability. The
//! caller picks the channel:
//!
//! ```
//! use guarded_ledger::{EmailNotifier, NotificationService, SmsNotifier};
//!
//! let email = NotificationService::new(EmailNotifier);
//! let sms = NotificationService::new(SmsNotifier);
//!
//! assert_eq!(email.send("hello").unwrap(), "Sending email: hello");
//! assert_eq!(sms.send("hello").unwrap(), "Sending SMS: hello");
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use tracing::info;

/// A channel able to deliver a message.
pub trait Notifier {
    type Error;

    /// Delivers `message` and returns a delivery receipt.
    fn send(&self, message: &str) -> Result<String, Self::Error>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    type Error = N::Error;

    fn send(&self, message: &str) -> Result<String, Self::Error> {
        (**self).send(message)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    type Error = N::Error;

    fn send(&self, message: &str) -> Result<String, Self::Error> {
        (**self).send(message)
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    type Error = N::Error;

    fn send(&self, message: &str) -> Result<String, Self::Error> {
        (**self).send(message)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailNotifier;

impl Notifier for EmailNotifier {
    type Error = Infallible;

    fn send(&self, message: &str) -> Result<String, Self::Error> {
        let receipt = format!("Sending email: {message}");
        info!(channel = "email", %message, "notification sent");
        Ok(receipt)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmsNotifier;

impl Notifier for SmsNotifier {
    type Error = Infallible;

    fn send(&self, message: &str) -> Result<String, Self::Error> {
        let receipt = format!("Sending SMS: {message}");
        info!(channel = "sms", %message, "notification sent");
        Ok(receipt)
    }
}

/// Sends messages through whichever [`Notifier`] it was built with.
#[derive(Debug, Clone)]
pub struct NotificationService<N> {
    notifier: N,
}

impl<N: Notifier> NotificationService<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    /// Forwards `message` to the notifier and returns its result unchanged.
    pub fn send(&self, message: &str) -> Result<String, N::Error> {
        self.notifier.send(message)
    }
}
