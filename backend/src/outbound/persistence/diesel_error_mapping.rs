//! Shared translation of pool and Diesel failures into port errors.
//!
//! Every adapter distinguishes the same two failure classes: the store was
//! unreachable (connection) or the statement itself failed (query). The
//! helpers here take the port-specific constructors as closures so each
//! adapter keeps its own error type while the classification logic lives in
//! one place. Constraint violations that carry domain meaning (duplicate
//! username, missing collection) are matched in the owning adapter before
//! falling back to these helpers.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure into an adapter's connection error.
pub(super) fn pool_error_into<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure into an adapter's query or connection error.
///
/// Database error messages are passed through so diagnostics survive into
/// the logs; the HTTP layer redacts them before they reach a client.
pub(super) fn diesel_error_into<E>(
    error: diesel::result::Error,
    query: impl Fn(String) -> E,
    connection: impl Fn(String) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        other => query(other.to_string()),
    }
}
