// region:    --- Modules
mod channel;
mod cli;
mod consumer;
mod error;
mod lifecycle;
mod probe;
mod resolver;
// endregion: --- Modules

use crate::{
	cli::args::Cli,
	lifecycle::{install_signal_handlers, TraceConfig},
};

pub use self::error::{Error, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
#[rustfmt::skip]
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> Result<()> {
	let args = Cli::parse();
	tracing_subscriber::fmt()
		.with_target(false)
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	// Bump the memlock rlimit. This is needed for older kernels that don't use the
	// new memcg based accounting, see https://lwn.net/Articles/837122/
	let rlim = libc::rlimit {
		rlim_cur: libc::RLIM_INFINITY,
		rlim_max: libc::RLIM_INFINITY,
	};
	let ret = unsafe { libc::setrlimit(libc::RLIMIT_MEMLOCK, &rlim) };
	if ret != 0 {
		debug!("remove limit on locked memory failed, ret is: {ret}");
	}

	let mut ebpf = aya::Ebpf::load(aya::include_bytes_aligned!(concat!(env!("OUT_DIR"), "/pamtrace")))?;
	if let Err(e) = aya_log::EbpfLogger::init(&mut ebpf) {
		// This can happen if you remove all log statements from your eBPF program.
		warn!("failed to initialize eBPF logger: {e}");
	}

	let config = TraceConfig {
		library: args.library,
		symbol: args.symbol,
	};

	let shutdown = CancellationToken::new();
	install_signal_handlers(shutdown.clone())?;

	lifecycle::run(&mut ebpf, &config, shutdown).await
}
