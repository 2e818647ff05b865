//! Keepalive timer using ESP-IDF's esp_timer API.
//!
//! The periodic callback only latches an `AtomicBool`; the main loop folds
//! the latch into the controller each tick.  Timer callbacks execute in the
//! ESP timer task context (not ISR), so the atomic store is always safe.

use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

static KEEPALIVE_DUE: AtomicBool = AtomicBool::new(false);

/// Latch a pending keepalive.  Callable from the timer task or from the
/// host simulation loop.
pub fn set_keepalive_due() {
    KEEPALIVE_DUE.store(true, Ordering::Release);
}

/// Consume the latch.  Returns `true` at most once per timer period.
pub fn take_keepalive_due() -> bool {
    KEEPALIVE_DUE.swap(false, Ordering::AcqRel)
}

#[cfg(target_os = "espidf")]
static mut KEEPALIVE_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: KEEPALIVE_TIMER is written once in `start_keepalive_timer()`
/// before any timer callbacks fire.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn keepalive_timer() -> esp_timer_handle_t {
    unsafe { KEEPALIVE_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn keepalive_cb(_arg: *mut core::ffi::c_void) {
    set_keepalive_due();
}

/// Start the periodic keepalive timer.
#[cfg(target_os = "espidf")]
pub fn start_keepalive_timer(interval_ms: u32) {
    // SAFETY: KEEPALIVE_TIMER is written here once at boot from the single
    // main-task context before any timer callbacks fire.  The callback
    // itself only stores into an atomic.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(keepalive_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"keepalive\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut KEEPALIVE_TIMER);
        if ret != ESP_OK {
            log::error!(
                "hw_timer: keepalive timer create failed (rc={}) — hub will see us go stale",
                ret
            );
            return;
        }
        let ret = esp_timer_start_periodic(KEEPALIVE_TIMER, u64::from(interval_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: keepalive timer start failed (rc={})", ret);
            return;
        }
        info!("hw_timer: keepalive every {interval_ms} ms");
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_keepalive_timer(interval_ms: u32) {
    log::info!("hw_timer(sim): keepalive timer not started ({interval_ms} ms period simulated by main loop)");
}

/// Stop the keepalive timer.
#[cfg(target_os = "espidf")]
pub fn stop_keepalive_timer() {
    // SAFETY: KEEPALIVE_TIMER is a valid handle if start succeeded;
    // null-check prevents double-free.
    unsafe {
        let t = keepalive_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_keepalive_timer() {}
