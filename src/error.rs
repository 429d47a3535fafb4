//! Error types for the settlement engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while validating a ledger,
//! computing balances or talking to a ledger repository.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the settlement engine.
///
/// All fallible operations in the crate return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use vaquita_settlement::error::EngineError;
///
/// let error = EngineError::GroupNotFound {
///     group_id: "asado".to_string(),
/// };
/// assert_eq!(error.to_string(), "Group not found: asado");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was outside its allowed range.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// An expense was malformed (non-positive amount, empty or duplicated split).
    #[error("Invalid expense '{expense_id}': {message}")]
    InvalidExpense {
        /// The ID of the invalid expense.
        expense_id: String,
        /// A description of what made the expense invalid.
        message: String,
    },

    /// An expense or transfer referenced a member outside the roster.
    #[error("{context} references unknown {role} '{member_id}'")]
    InvalidReference {
        /// The entry holding the dangling reference (e.g., "Expense 'exp_001'").
        context: String,
        /// The identifier that could not be resolved.
        member_id: String,
        /// Where the identifier appeared ("payer", "participant", ...).
        role: String,
    },

    /// A transfer could not be recorded (self-transfer or non-positive amount).
    #[error("Invalid transfer {from} -> {to}: {message}")]
    InvalidTransfer {
        /// The paying member.
        from: String,
        /// The receiving member.
        to: String,
        /// Why the transfer was rejected.
        message: String,
    },

    /// The member roster listed the same identifier twice.
    #[error("Duplicate member in roster: {member_id}")]
    DuplicateMember {
        /// The repeated identifier.
        member_id: String,
    },

    /// A set of balances missed zero by more than one minor unit.
    #[error("Balances do not net to zero (total {total})")]
    UnbalancedLedger {
        /// The sum of all supplied balances.
        total: Decimal,
    },

    /// The requested group does not exist in the repository.
    #[error("Group not found: {group_id}")]
    GroupNotFound {
        /// The group identifier that was looked up.
        group_id: String,
    },

    /// The ledger repository failed to serve a request.
    #[error("Repository error: {message}")]
    RepositoryError {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
