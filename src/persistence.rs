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

//! Data persistence.
//!
//! [`OrderService`] and [`UserService`] are written against the [`Database`]
//! capability only; any backend can be swapped in without touching them.
//! The bundled backends keep what they receive in memory.
//!
//! ```
//! use guarded_ledger::{MongoDatabase, MySqlDatabase, OrderId, OrderService};
//! use std::sync::Arc;
//!
//! let mysql = Arc::new(MySqlDatabase::default());
//! let orders = OrderService::new(Arc::clone(&mysql));
//! orders.process_order(&OrderId::from("001")).unwrap();
//! assert_eq!(mysql.records(), vec!["Order 001 processed"]);
//!
//! let orders = OrderService::new(MongoDatabase::default());
//! orders.process_order(&OrderId::from("002")).unwrap();
//! ```

use crate::base::OrderId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::info;

/// A backend able to store a payload.
pub trait Database {
    type Error;

    fn save(&self, data: &str) -> Result<(), Self::Error>;
}

impl<D: Database + ?Sized> Database for &D {
    type Error = D::Error;

    fn save(&self, data: &str) -> Result<(), Self::Error> {
        (**self).save(data)
    }
}

impl<D: Database + ?Sized> Database for Box<D> {
    type Error = D::Error;

    fn save(&self, data: &str) -> Result<(), Self::Error> {
        (**self).save(data)
    }
}

impl<D: Database + ?Sized> Database for Arc<D> {
    type Error = D::Error;

    fn save(&self, data: &str) -> Result<(), Self::Error> {
        (**self).save(data)
    }
}

/// Append-only in-memory log shared by the bundled backends.
#[derive(Debug, Default)]
struct RecordLog {
    records: Mutex<Vec<String>>,
}

impl RecordLog {
    fn append(&self, engine: &'static str, data: &str) {
        self.records.lock().push(data.to_owned());
        info!(engine, %data, "record saved");
    }

    fn snapshot(&self) -> Vec<String> {
        self.records.lock().clone()
    }
}

#[derive(Debug, Default)]
pub struct MySqlDatabase {
    log: RecordLog,
}

impl MySqlDatabase {
    /// Payloads saved so far, oldest first.
    pub fn records(&self) -> Vec<String> {
        self.log.snapshot()
    }
}

impl Database for MySqlDatabase {
    type Error = Infallible;

    fn save(&self, data: &str) -> Result<(), Self::Error> {
        self.log.append("mysql", data);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PostgresDatabase {
    log: RecordLog,
}

impl PostgresDatabase {
    /// Payloads saved so far, oldest first.
    pub fn records(&self) -> Vec<String> {
        self.log.snapshot()
    }
}

impl Database for PostgresDatabase {
    type Error = Infallible;

    fn save(&self, data: &str) -> Result<(), Self::Error> {
        self.log.append("postgres", data);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MongoDatabase {
    log: RecordLog,
}

impl MongoDatabase {
    /// Documents saved so far, oldest first.
    pub fn records(&self) -> Vec<String> {
        self.log.snapshot()
    }
}

impl Database for MongoDatabase {
    type Error = Infallible;

    fn save(&self, data: &str) -> Result<(), Self::Error> {
        self.log.append("mongodb", data);
        Ok(())
    }
}

/// Processes orders and stores the outcome through a [`Database`].
#[derive(Debug, Clone)]
pub struct OrderService<D> {
    database: D,
}

impl<D: Database> OrderService<D> {
    pub fn new(database: D) -> Self {
        Self { database }
    }

    /// Saves `"Order <id> processed"`. Backend errors are returned as-is.
    pub fn process_order(&self, order_id: &OrderId) -> Result<(), D::Error> {
        info!(order = %order_id, "processing order");
        self.database.save(&format!("Order {order_id} processed"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub name: String,
}

/// Keeps a user directory and mirrors every registration to a [`Database`].
#[derive(Debug)]
pub struct UserService<D> {
    database: D,
    users: Mutex<HashMap<String, User>>,
}

impl<D: Database> UserService<D> {
    pub fn new(database: D) -> Self {
        Self {
            database,
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a user, replacing any previous entry with the same email.
    ///
    /// Returns the payload handed to the backend. If the backend fails the
    /// directory is left unchanged.
    pub fn save_user(&self, email: &str, name: &str) -> Result<String, D::Error> {
        let payload = format!("User saved: {email}");
        self.database.save(&payload)?;

        self.users.lock().insert(
            email.to_owned(),
            User {
                email: email.to_owned(),
                name: name.to_owned(),
            },
        );
        Ok(payload)
    }

    pub fn get_user(&self, email: &str) -> Option<User> {
        self.users.lock().get(email).cloned()
    }
}
