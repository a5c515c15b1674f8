use aya::Ebpf;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
	channel::EventChannel,
	consumer,
	error::{Error, Result},
	probe,
	resolver,
};

const EVENTS_MAP: &str = "AUTH_EVENTS";

pub struct TraceConfig {
	pub library: String,
	pub symbol: String,
}

/// Drive one capture run. Startup is strictly ordered: resolve the
/// library, attach the probes, open the event channel. Any startup
/// failure propagates out; the caller terminates the process. Teardown
/// happens in reverse once the channel closes.
pub async fn run(ebpf: &mut Ebpf, config: &TraceConfig, shutdown: CancellationToken) -> Result<()> {
	let library_path = resolver::find_library_path(&config.library)?;
	info!("{} resolved to {library_path}", config.library);

	let attachment = probe::attach(ebpf, &library_path, &config.symbol)?;
	info!("return probe attached to {}", config.symbol);

	let map = ebpf.take_map(EVENTS_MAP).ok_or(Error::EbpfProgNotFound)?;
	let mut channel = EventChannel::open(map, shutdown)?;
	info!("waiting for events..");

	let emitted = consumer::consume(&mut channel, consumer::log_event).await;
	info!("received signal, exiting after {emitted} events");

	// Release in reverse acquisition order: channel mapping first,
	// then the probe attachment.
	drop(channel);
	drop(attachment);

	Ok(())
}

/// The watcher's only job is closing the event channel; the consume
/// loop observes the close and unwinds.
pub fn install_signal_handlers(token: CancellationToken) -> Result<()> {
	use tokio::signal::unix::{signal, SignalKind};

	let mut sigterm = signal(SignalKind::terminate())?;

	let t = token.clone();
	tokio::spawn(async move {
		let _ = tokio::signal::ctrl_c().await;
		t.cancel();
	});

	tokio::spawn(async move {
		sigterm.recv().await;
		token.cancel();
	});

	Ok(())
}
