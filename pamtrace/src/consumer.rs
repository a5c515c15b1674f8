use std::borrow::Cow;

use pamtrace_common::AuthEvent;
use tracing::{info, warn};
use zerocopy::FromBytes;

use crate::error::{Error, Result};

/// Anything that hands out whole ring buffer records. `None` means the
/// channel is closed and no further records will be delivered.
pub trait RecordSource {
	async fn recv(&mut self) -> Option<Vec<u8>>;
}

/// Decode one raw record. Anything that is not exactly the wire size
/// is malformed; malformed records never abort the run.
pub fn decode_record(data: &[u8]) -> Result<AuthEvent> {
	AuthEvent::read_from_bytes(data).map_err(|_| Error::InvalidRecordSize(data.len()))
}

/// Text content of a fixed-size capture buffer: everything up to the
/// first zero byte, or the whole buffer when it is exactly full.
pub fn field_text(buf: &[u8]) -> Cow<'_, str> {
	let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
	String::from_utf8_lossy(&buf[..len])
}

/// Drain `source` until it closes, feeding each decoded event to
/// `emit`. Returns how many events were emitted.
pub async fn consume<S, F>(source: &mut S, mut emit: F) -> u64
where
	S: RecordSource,
	F: FnMut(&AuthEvent),
{
	let mut emitted = 0;
	while let Some(record) = source.recv().await {
		match decode_record(&record) {
			Ok(event) => {
				emit(&event);
				emitted += 1;
			}
			Err(err) => warn!("skipping record: {err}"),
		}
	}
	emitted
}

pub fn log_event(event: &AuthEvent) {
	info!(
		"pid: {} comm: {} username: {} password: {}",
		event.pid,
		field_text(&event.comm),
		field_text(&event.username),
		field_text(&event.password),
	);
}

// region:    --- Tests


// endregion: --- Tests
