use which::which;

// Compiling this crate needs `bpf-linker` on PATH; fail the build up
// front with a useful error rather than deep inside rustc.
fn main() {
	let bpf_linker = which("bpf-linker").unwrap();
	println!("cargo:rerun-if-changed={}", bpf_linker.to_str().unwrap());
}
