//! Database readiness probing.
//!
//! The prober answers one question within a bounded time budget: can we
//! complete a trivial authenticated round-trip against the configured
//! database? Failures are classified structurally into two cases. Transient
//! failures (the server is not up yet) are retried until the budget runs
//! out; fatal failures (bad credentials, unknown database) abort
//! immediately, because waiting cannot fix them.

use std::time::{Duration, Instant};

use postgres::error::SqlState;
use postgres::NoTls;

use crate::database::config::ConnectionProfile;
use crate::database::schema::PING_QUERY;
use crate::error::{Error, Result};

/// Default wall-clock budget for `--wait-for-db`.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default sleep between probe attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Classification of a failed probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Worth retrying: the server may simply not be up yet.
    Transient,
    /// Retrying cannot help: credentials or target database are wrong.
    Fatal,
}

/// A single failed probe attempt, already classified.
#[derive(Debug, Clone)]
pub enum ProbeError {
    /// The database was not reachable; carries the error text.
    Transient(String),
    /// The database rejected us in a way retrying cannot fix.
    Fatal(String),
}

/// Classifies a driver error into the retry/abort taxonomy.
///
/// The decision is structural: SQLSTATE class 28 (invalid authorization)
/// and `3D000` (undefined database) are fatal; every other server-reported
/// state, and any transport-level failure without a SQLSTATE (connection
/// refused, host unresolved, reset), is transient.
#[must_use]
pub fn classify(error: &postgres::Error) -> FailureClass {
    if let Some(state) = error.code() {
        if state.code().starts_with("28") || *state == SqlState::INVALID_CATALOG_NAME {
            return FailureClass::Fatal;
        }
        // Startup states such as CANNOT_CONNECT_NOW (57P03) and the
        // connection-exception class (08xxx) resolve themselves once the
        // server finishes coming up.
        return FailureClass::Transient;
    }
    FailureClass::Transient
}

/// Performs one probe attempt: connect and run a no-op query.
///
/// # Errors
///
/// Returns a classified [`ProbeError`] on failure.
pub fn ping(profile: &ConnectionProfile) -> std::result::Result<(), ProbeError> {
    let attempt = profile
        .probe_config()
        .connect(NoTls)
        .and_then(|mut client| client.simple_query(PING_QUERY).map(|_| ()));

    attempt.map_err(|error| match classify(&error) {
        FailureClass::Transient => ProbeError::Transient(error.to_string()),
        FailureClass::Fatal => ProbeError::Fatal(error.to_string()),
    })
}

/// Waits until the configured database answers a trivial round-trip.
///
/// Retries transient failures every `poll_interval` until `timeout` of
/// wall-clock time has elapsed; a `timeout` of zero means exactly one
/// attempt. Fatal failures abort immediately without sleeping.
///
/// # Errors
///
/// - [`Error::Unreachable`] if only transient failures were observed for
///   the whole budget; carries the last one for diagnostics.
/// - [`Error::AuthFailure`] on the first fatal failure.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use dbready::{probe, ConnectionProfile};
///
/// let profile = ConnectionProfile::resolve("postgres://app@localhost/app").unwrap();
/// probe::wait_until_ready(&profile, Duration::from_secs(30), Duration::from_secs(2)).unwrap();
/// ```
pub fn wait_until_ready(
    profile: &ConnectionProfile,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    log::info!(
        "waiting for database at {} (timeout {}s)",
        profile.redacted(),
        timeout.as_secs()
    );
    wait_with_probe(|| ping(profile), timeout, poll_interval)
}

/// Retry loop over an arbitrary probe function.
///
/// This is the seam [`wait_until_ready`] is built on; tests inject probe
/// functions to exercise the timing contract without a server.
///
/// # Errors
///
/// Same contract as [`wait_until_ready`].
pub fn wait_with_probe<F>(mut probe: F, timeout: Duration, poll_interval: Duration) -> Result<()>
where
    F: FnMut() -> std::result::Result<(), ProbeError>,
{
    let start = Instant::now();
    let mut last_error = String::from("no probe attempt was made");

    loop {
        match probe() {
            Ok(()) => {
                log::debug!("database ready after {:?}", start.elapsed());
                return Ok(());
            }
            Err(ProbeError::Fatal(message)) => {
                return Err(Error::AuthFailure { message });
            }
            Err(ProbeError::Transient(message)) => {
                log::debug!("database not ready yet: {message}");
                last_error = message;
            }
        }

        if start.elapsed() >= timeout {
            return Err(Error::Unreachable {
                waited_secs: start.elapsed().as_secs(),
                last_error,
            });
        }
        std::thread::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_ready_after_delay_succeeds_with_bounded_attempts() {
        let calls = AtomicUsize::new(0);
        let start = Instant::now();
        let ready_at = Duration::from_millis(300);

        let result = wait_with_probe(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                if start.elapsed() >= ready_at {
                    Ok(())
                } else {
                    Err(ProbeError::Transient("connection refused".into()))
                }
            },
            Duration::from_millis(1000),
            Duration::from_millis(100),
        );

        result.unwrap();
        let count = calls.load(Ordering::SeqCst);
        // Attempts roughly every 100ms until ready around 300ms.
        assert!((3..=8).contains(&count), "unexpected attempt count {count}");
    }

    #[test]
    fn test_fatal_aborts_immediately_without_sleeping() {
        let calls = AtomicUsize::new(0);
        let start = Instant::now();

        let result = wait_with_probe(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProbeError::Fatal("password authentication failed".into()))
            },
            Duration::from_secs(5),
            Duration::from_secs(1),
        );

        let err = result.unwrap_err();
        assert!(matches!(err, Error::AuthFailure { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_timeout_carries_last_transient_error() {
        let calls = AtomicUsize::new(0);

        let result = wait_with_probe(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Err(ProbeError::Transient(format!("attempt {n} refused")))
            },
            Duration::from_millis(250),
            Duration::from_millis(100),
        );

        match result.unwrap_err() {
            Error::Unreachable { last_error, .. } => {
                let final_attempt = calls.load(Ordering::SeqCst) - 1;
                assert_eq!(last_error, format!("attempt {final_attempt} refused"));
            }
            other => panic!("expected Unreachable, got {other}"),
        }
        assert!(calls.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_zero_timeout_means_exactly_one_attempt() {
        let calls = AtomicUsize::new(0);

        let result = wait_with_probe(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProbeError::Transient("refused".into()))
            },
            Duration::ZERO,
            Duration::from_millis(100),
        );

        assert!(matches!(result.unwrap_err(), Error::Unreachable { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_success_on_first_attempt_probes_once() {
        let calls = AtomicUsize::new(0);

        wait_with_probe(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transient_then_fatal_aborts_on_the_fatal() {
        let calls = AtomicUsize::new(0);

        let result = wait_with_probe(
            || {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ProbeError::Transient("refused".into()))
                } else {
                    Err(ProbeError::Fatal("database \"app\" does not exist".into()))
                }
            },
            Duration::from_secs(5),
            Duration::from_millis(10),
        );

        assert!(matches!(result.unwrap_err(), Error::AuthFailure { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
