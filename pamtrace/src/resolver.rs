use std::process::Command;

use crate::error::{Error, Result};

/// Resolve a library name fragment to an absolute path through the
/// dynamic linker cache. The first matching cache entry wins; cache
/// ordering is whatever `ldconfig` reports.
pub fn find_library_path(fragment: &str) -> Result<String> {
	let output = Command::new("ldconfig")
		.arg("-p")
		.output()
		.map_err(|err| Error::Ldconfig(err.to_string()))?;

	if !output.status.success() {
		return Err(Error::Ldconfig(format!("exited with {}", output.status)));
	}

	let listing = String::from_utf8_lossy(&output.stdout);
	parse_cache_listing(&listing, fragment).ok_or_else(|| Error::LibraryNotFound(fragment.to_string()))
}

/// `ldconfig -p` prints one `name (flags) => /path` line per entry;
/// the path follows the rightmost `>` on the line.
fn parse_cache_listing(listing: &str, fragment: &str) -> Option<String> {
	let line = listing.lines().find(|line| line.contains(fragment))?;
	let (_, path) = line.rsplit_once('>')?;
	Some(path.trim().to_string())
}

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;

	const FX_LISTING: &str = "\
	342 libs found in cache `/etc/ld.so.cache'
	libpcre2-8.so.0 (libc6,x86-64) => /lib/x86_64-linux-gnu/libpcre2-8.so.0
	libpam_misc.so.0 (libc6,x86-64) => /lib/x86_64-linux-gnu/libpam_misc.so.0
	libpam.so.0 (libc6,x86-64) => /lib/x86_64-linux-gnu/libpam.so.0
	libm.so.6 (libc6,x86-64) => /lib/x86_64-linux-gnu/libm.so.6";

	#[test]
	fn parse_returns_first_matching_line() -> Result<()> {
		// -- Setup & Fixtures
		let fx_fragment = "libpam.so.0";
		// -- Exec
		let path = parse_cache_listing(FX_LISTING, fx_fragment);
		// -- Check
		// libpam_misc.so.0 does not contain the fragment, so the
		// libpam.so.0 entry is the first match.
		assert_eq!(path.as_deref(), Some("/lib/x86_64-linux-gnu/libpam.so.0"));

		Ok(())
	}

	#[test]
	fn parse_prefers_earlier_lines() -> Result<()> {
		// -- Setup & Fixtures
		let fx_fragment = "libpam";
		// -- Exec
		let path = parse_cache_listing(FX_LISTING, fx_fragment);
		// -- Check
		assert_eq!(path.as_deref(), Some("/lib/x86_64-linux-gnu/libpam_misc.so.0"));

		Ok(())
	}

	#[test]
	fn parse_splits_on_rightmost_delimiter() -> Result<()> {
		// -- Setup & Fixtures
		// A `>` in the entry name must not end the search early.
		let fx_listing = "lib>weird.so (libc6) => /opt/lib/libweird.so";
		// -- Exec
		let path = parse_cache_listing(fx_listing, "weird");
		// -- Check
		assert_eq!(path.as_deref(), Some("/opt/lib/libweird.so"));

		Ok(())
	}

	#[test]
	fn parse_trims_surrounding_whitespace() -> Result<()> {
		// -- Setup & Fixtures
		let fx_listing = "libz.so.1 (libc6,x86-64) =>   /lib/libz.so.1  ";
		// -- Exec
		let path = parse_cache_listing(fx_listing, "libz");
		// -- Check
		assert_eq!(path.as_deref(), Some("/lib/libz.so.1"));

		Ok(())
	}

	#[test]
	fn parse_without_match_is_none() -> Result<()> {
		// -- Setup & Fixtures
		let fx_fragment = "libdoesnotexist";
		// -- Exec
		let path = parse_cache_listing(FX_LISTING, fx_fragment);
		// -- Check
		assert!(path.is_none());

		Ok(())
	}
}

// endregion: --- Tests
