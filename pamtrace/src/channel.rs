use aya::maps::{Map, MapData, RingBuf};
use tokio::io::unix::AsyncFd;
use tokio_util::sync::CancellationToken;

use crate::consumer::RecordSource;
use crate::error::Result;

/// Consumer side of the kernel ring buffer.
///
/// Records come out whole and in submission order. Cancelling `closed`
/// closes the channel: an in-flight `recv` unblocks and every `recv`
/// from then on returns `None` without touching the ring. Dropping the
/// channel releases the ring buffer mapping.
pub struct EventChannel {
	ring: AsyncFd<RingBuf<MapData>>,
	closed: CancellationToken,
}

impl EventChannel {
	pub fn open(map: Map, closed: CancellationToken) -> Result<Self> {
		let ring = RingBuf::try_from(map)?;
		let ring = AsyncFd::new(ring)?;
		Ok(EventChannel { ring, closed })
	}
}

impl RecordSource for EventChannel {
	async fn recv(&mut self) -> Option<Vec<u8>> {
		loop {
			if self.closed.is_cancelled() {
				return None;
			}

			// Drain already-submitted records before blocking.
			if let Some(record) = self.ring.get_mut().next() {
				return Some(record.to_vec());
			}

			let mut guard = tokio::select! {
				_ = self.closed.cancelled() => return None,

				readable = self.ring.readable_mut() => match readable {
					Ok(guard) => guard,
					Err(_) => return None,
				},
			};
			guard.clear_ready();
		}
	}
}
