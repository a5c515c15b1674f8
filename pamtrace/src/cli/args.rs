use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "pamtrace")]
pub struct Cli {
	#[arg(long, default_value = "libpam.so.0", help = "Library name fragment, resolved through the linker cache")]
	pub library: String,

	#[arg(long, default_value = "pam_get_authtok", help = "Exported symbol to attach the return probe to")]
	pub symbol: String,
}
