//! Hand-off between built token sequences and the `redis` transport.
//!
//! The builders produce ordered byte tokens; this module packs them into a
//! [`redis::Cmd`] verbatim and awaits the generic reply tree. It is the only
//! suspension point in the crate.

use redis::aio::MultiplexedConnection;
use redis::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::command::Tokens;
use crate::error::{Error, Result};

/// Pack an ordered token sequence into a command, preserving order and
/// bytes exactly.
pub(crate) fn pack(tokens: &Tokens) -> redis::Cmd {
    let mut cmd = redis::Cmd::new();
    for token in tokens {
        cmd.arg(token.as_slice());
    }
    cmd
}

/// Send one command and await the reply.
///
/// A fired cancellation token aborts the wait and surfaces
/// [`Error::Cancelled`]; the command may still execute server-side.
pub(crate) async fn send(
    conn: &mut MultiplexedConnection,
    tokens: Tokens,
    cancel: Option<&CancellationToken>,
) -> Result<Value> {
    if let Some(name) = tokens.first() {
        debug!(
            command = %String::from_utf8_lossy(name),
            arity = tokens.len(),
            "sending geo command"
        );
    }
    let cmd = pack(&tokens);
    match cancel {
        Some(token) => {
            tokio::select! {
                _ = token.cancelled() => Err(Error::Cancelled),
                reply = cmd.query_async::<Value>(conn) => Ok(reply?),
            }
        },
        None => Ok(cmd.query_async::<Value>(conn).await?),
    }
}
