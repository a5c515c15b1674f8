use std::fs;

use aya::programs::uprobe::{UProbe, UProbeLink};
use aya::Ebpf;
use object::{Object, ObjectSection, ObjectSymbol};
use tracing::debug;

use crate::error::{Error, Result};

const ENTER_PROG: &str = "authtok_enter";
const EXIT_PROG: &str = "authtok_exit";

/// Live instrumentation on the target function. The return probe fires
/// for every process that calls through the library while attached;
/// dropping the handle detaches both probes.
pub struct Attachment {
	_enter: UProbeLink,
	_exit: UProbeLink,
}

/// Resolve `symbol` inside the image at `library_path` and attach the
/// entry/return probe pair there.
pub fn attach(ebpf: &mut Ebpf, library_path: &str, symbol: &str) -> Result<Attachment> {
	let offset = symbol_offset(library_path, symbol)?;
	debug!("{symbol} is at byte offset {offset:#x} in {library_path}");

	let enter = attach_at(ebpf, ENTER_PROG, library_path, offset)?;
	let exit = attach_at(ebpf, EXIT_PROG, library_path, offset)?;

	Ok(Attachment { _enter: enter, _exit: exit })
}

fn attach_at(ebpf: &mut Ebpf, prog: &str, library_path: &str, offset: u64) -> Result<UProbeLink> {
	let program: &mut UProbe = ebpf.program_mut(prog).ok_or(Error::EbpfProgNotFound)?.try_into()?;
	program.load()?;
	let link_id = program.attach(None, offset, library_path, None)?;
	Ok(program.take_link(link_id)?)
}

/// Byte offset of an exported symbol inside the ELF image at `path`.
/// Dynamic symbols are tried first, the way the dynamic linker itself
/// resolves the name.
fn symbol_offset(path: &str, symbol: &str) -> Result<u64> {
	let data = fs::read(path)?;
	let obj = object::File::parse(data.as_slice())?;

	let sym = obj
		.dynamic_symbols()
		.chain(obj.symbols())
		.find(|sym| sym.name() == Ok(symbol))
		.ok_or_else(|| Error::SymbolNotFound {
			symbol: symbol.to_string(),
			library: path.to_string(),
		})?;

	// st_value is a virtual address; uprobe offsets are file offsets.
	let index = sym.section_index().ok_or_else(|| Error::SymbolNotFound {
		symbol: symbol.to_string(),
		library: path.to_string(),
	})?;
	let section = obj.section_by_index(index)?;
	let (file_offset, _) = section
		.file_range()
		.ok_or_else(|| Error::custom(format!("section holding `{symbol}` has no file data")))?;

	Ok(sym.address() - section.address() + file_offset)
}

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use std::io::Write;

	use super::*;

	#[test]
	fn symbol_offset_rejects_non_elf_input() -> Result<()> {
		// -- Setup & Fixtures
		let mut fx_file = tempfile::NamedTempFile::new()?;
		fx_file.write_all(b"definitely not an ELF image")?;
		// -- Exec
		let res = symbol_offset(fx_file.path().to_str().unwrap(), "pam_get_authtok");
		// -- Check
		assert!(matches!(res, Err(Error::Elf(_))));

		Ok(())
	}

	#[test]
	fn symbol_offset_reports_missing_symbol() -> Result<()> {
		// -- Setup & Fixtures
		let fx_binary = std::env::current_exe()?;
		let fx_symbol = "definitely_not_a_symbol_anyone_exports";
		// -- Exec
		let res = symbol_offset(fx_binary.to_str().unwrap(), fx_symbol);
		// -- Check
		assert!(matches!(res, Err(Error::SymbolNotFound { .. })));

		Ok(())
	}
}

// endregion: --- Tests
