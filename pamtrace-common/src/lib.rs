#![no_std]

use zerocopy_derive::{FromBytes, Immutable, KnownLayout};

pub const COMM_LEN: usize = 16;
pub const CRED_LEN: usize = 80;

/// Wire size of one ring buffer record. The kernel side writes exactly
/// this many bytes, little-endian, per captured authentication.
pub const RECORD_SIZE: usize = 180;

/// One captured authentication, as laid out in the ring buffer.
///
/// Text buffers are zero padded; a buffer with no zero byte is exactly
/// full and carries no terminator.
#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, Immutable, KnownLayout)]
pub struct AuthEvent {
	pub pid: i32,
	pub comm: [u8; COMM_LEN],
	pub username: [u8; CRED_LEN],
	pub password: [u8; CRED_LEN],
}

const _: () = assert!(core::mem::size_of::<AuthEvent>() == RECORD_SIZE);
