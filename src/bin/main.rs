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

use clap::{Parser, Subcommand, ValueEnum};
use csv::Writer;
use guarded_ledger::{
    Account, Database, EmailNotifier, InvalidArgument, MongoDatabase, MySqlDatabase,
    NotificationService, Notifier, OrderId, OrderService, PostgresDatabase, SmsNotifier,
};
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::io::Write;
use std::process;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Guarded Ledger - Account and service demonstrations
///
/// Log verbosity is controlled through `RUST_LOG` (default: warn). Logs go to
/// stderr, results to stdout.
#[derive(Parser, Debug)]
#[command(name = "guarded-ledger")]
#[command(about = "Drive a guarded account or an injected service from the command line", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open an account, apply operations in order and print its snapshot as CSV
    ///
    /// Example: guarded-ledger account 001 --initial-balance 1000 withdraw=2000 deposit=500
    Account {
        /// Account number
        number: String,

        #[arg(long, default_value = "0")]
        initial_balance: Decimal,

        /// deposit=<AMOUNT>, withdraw=<AMOUNT> or close
        #[arg(value_name = "OP")]
        ops: Vec<Operation>,
    },

    /// Send a message through a notification channel
    Notify {
        #[arg(long, value_enum, default_value_t = Channel::Email)]
        channel: Channel,

        message: String,
    },

    /// Process orders against a persistence backend and print what it stored
    Order {
        #[arg(long, value_enum, default_value_t = Backend::Mysql)]
        backend: Backend,

        #[arg(value_name = "ORDER_ID", required = true)]
        order_ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Channel {
    Email,
    Sms,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Mysql,
    Postgres,
    Mongo,
}

/// Single account operation given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Deposit(Decimal),
    Withdraw(Decimal),
    Close,
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("close") {
            return Ok(Operation::Close);
        }

        let (kind, amount) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <kind>=<amount> or close, got '{s}'"))?;
        let amount = Decimal::from_str(amount.trim())
            .map_err(|e| format!("invalid amount '{amount}': {e}"))?;

        match kind.trim().to_lowercase().as_str() {
            "deposit" => Ok(Operation::Deposit(amount)),
            "withdraw" | "withdrawal" => Ok(Operation::Withdraw(amount)),
            other => Err(format!("unknown operation '{other}'")),
        }
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Account {
            number,
            initial_balance,
            ops,
        } => {
            let account = match run_account(number, initial_balance, &ops) {
                Ok(account) => account,
                Err(e) => {
                    eprintln!("Error opening account: {}", e);
                    process::exit(1);
                }
            };

            if let Err(e) = write_account(&account, std::io::stdout()) {
                eprintln!("Error writing output: {}", e);
                process::exit(1);
            }
        }
        Command::Notify { channel, message } => {
            let notifier: Box<dyn Notifier<Error = Infallible>> = match channel {
                Channel::Email => Box::new(EmailNotifier),
                Channel::Sms => Box::new(SmsNotifier),
            };
            let service = NotificationService::new(notifier);
            println!("{}", into_ok(service.send(&message)));
        }
        Command::Order { backend, order_ids } => {
            let records = match backend {
                Backend::Mysql => {
                    let database = MySqlDatabase::default();
                    into_ok(process_orders(&database, &order_ids));
                    database.records()
                }
                Backend::Postgres => {
                    let database = PostgresDatabase::default();
                    into_ok(process_orders(&database, &order_ids));
                    database.records()
                }
                Backend::Mongo => {
                    let database = MongoDatabase::default();
                    into_ok(process_orders(&database, &order_ids));
                    database.records()
                }
            };

            for record in records {
                println!("{}", record);
            }
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the `warn` default.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Opens an account and applies `ops` in order.
///
/// Rejected operations are logged by the account and do not stop the run.
///
/// # Errors
///
/// Returns [`InvalidArgument`] if the account cannot be opened.
fn run_account(
    number: String,
    initial_balance: Decimal,
    ops: &[Operation],
) -> Result<Account, InvalidArgument> {
    let account = Account::new(number, initial_balance)?;

    for op in ops {
        match *op {
            Operation::Deposit(amount) => account.deposit(amount),
            Operation::Withdraw(amount) => account.withdraw(amount),
            Operation::Close => account.close(),
        };
    }

    Ok(account)
}

/// Runs every order through one [`OrderService`], stopping at the first backend error.
fn process_orders<D: Database>(database: D, order_ids: &[String]) -> Result<(), D::Error> {
    let service = OrderService::new(database);
    for order_id in order_ids {
        service.process_order(&OrderId(order_id.clone()))?;
    }
    Ok(())
}

/// Write the account snapshot to a CSV writer
///
/// # CSV Format
///
/// Columns: `account, balance, active, transactions`
///
/// ```csv
/// account,balance,active,transactions
/// 001,1200,true,2
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
fn write_account<W: Write>(account: &Account, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    wtr.serialize(account)?;
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_operations() {
        assert_eq!(
            "deposit=500".parse::<Operation>(),
            Ok(Operation::Deposit(dec!(500)))
        );
        assert_eq!(
            " withdraw = 12.50".parse::<Operation>(),
            Ok(Operation::Withdraw(dec!(12.50)))
        );
        assert_eq!("CLOSE".parse::<Operation>(), Ok(Operation::Close));
    }

    #[test]
    fn reject_malformed_operations() {
        assert!("deposit".parse::<Operation>().is_err());
        assert!("deposit=abc".parse::<Operation>().is_err());
        assert!("transfer=10".parse::<Operation>().is_err());
    }

    #[test]
    fn account_scenario() {
        let ops = [
            Operation::Withdraw(dec!(2000)),
            Operation::Deposit(dec!(500)),
            Operation::Withdraw(dec!(300)),
            Operation::Close,
        ];
        let account = run_account("001".into(), dec!(1000), &ops).unwrap();

        assert_eq!(account.balance(), dec!(1200));
        assert!(account.is_active());
        assert_eq!(account.transaction_history(), vec!["Deposit: 500", "Withdrawal: 300"]);
    }

    #[test]
    fn overflowing_deposit_still_writes_snapshot() {
        let op: Operation = "deposit=79228162514264337593543950335".parse().unwrap();
        let account = run_account("001".into(), Decimal::ONE, &[op]).unwrap();

        let mut output = Vec::new();
        write_account(&account, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output_str.lines().collect();
        assert_eq!(lines, vec!["account,balance,active,transactions", "001,1,true,0"]);
    }

    #[test]
    fn account_rejects_negative_initial_balance() {
        let result = run_account("001".into(), dec!(-1), &[]);
        assert_eq!(result.unwrap_err(), InvalidArgument::NegativeInitialBalance);
    }

    #[test]
    fn write_account_to_csv() {
        let account = run_account(
            "001".into(),
            dec!(1000),
            &[Operation::Deposit(dec!(500)), Operation::Withdraw(dec!(300))],
        )
        .unwrap();

        let mut output = Vec::new();
        write_account(&account, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output_str.lines().collect();
        assert_eq!(lines, vec!["account,balance,active,transactions", "001,1200,true,2"]);
    }

    #[test]
    fn orders_are_recorded_by_the_chosen_backend() {
        let database = PostgresDatabase::default();
        into_ok(process_orders(&database, &["001".to_string(), "002".to_string()]));
        assert_eq!(
            database.records(),
            vec!["Order 001 processed", "Order 002 processed"]
        );
    }

    #[test]
    fn cli_parses_order_command() {
        let args =
            Args::try_parse_from(["guarded-ledger", "order", "--backend", "mongo", "7"]).unwrap();
        match args.command {
            Command::Order { backend, order_ids } => {
                assert!(matches!(backend, Backend::Mongo));
                assert_eq!(order_ids, vec!["7"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
