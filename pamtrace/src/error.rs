use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
#[display("{self:?}")]
pub enum Error {
	#[from(String, &String, &str)]
	Custom(String),
	#[display("no library matching `{_0}` in the linker cache")]
	LibraryNotFound(String),
	#[display("ldconfig: {_0}")]
	Ldconfig(String),
	#[display("symbol `{symbol}` not found in {library}")]
	SymbolNotFound { symbol: String, library: String },
	EbpfProgNotFound,
	#[display("malformed record of {_0} bytes")]
	InvalidRecordSize(usize),

	// -- Externals
	//
	#[from]
	Io(std::io::Error),
	#[from]
	Elf(object::read::Error),
	#[from]
	AyaEbpf(aya::EbpfError),
	#[from]
	AyaMaps(aya::maps::MapError),
	#[from]
	AyaProgram(aya::programs::ProgramError),
}

// region:    --- Custom

impl Error {
	pub fn custom(val: impl Into<String>) -> Self {
		Self::Custom(val.into())
	}
}

// endregion: --- Custom

// region:    --- Error Boilerplate

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate
