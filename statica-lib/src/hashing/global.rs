use core::{
    cell::UnsafeCell,
    hint::spin_loop,
    mem::MaybeUninit,
    sync::atomic::{AtomicU8, AtomicUsize, Ordering},
};

use super::{config::HashingConfig, entropy::SystemEntropy, HashingParameters};

const UNINIT: u8 = 0;
const RUNNING: u8 = 1;
const READY: u8 = 2;

struct Storage {
    state: AtomicU8,
    parameters: UnsafeCell<MaybeUninit<HashingParameters>>,
}

// SAFETY: `parameters` is written only by the thread that moved `state` from
// UNINIT to RUNNING, and read only after `state` is READY, which never changes.
unsafe impl Sync for Storage {}

static STORAGE: Storage = Storage {
    state: AtomicU8::new(UNINIT),
    parameters: UnsafeCell::new(MaybeUninit::uninit()),
};

static INITIALIZATIONS: AtomicUsize = AtomicUsize::new(0);

/// How many times the parameters have been computed in this process.
pub fn initializations() -> usize {
    INITIALIZATIONS.load(Ordering::Relaxed)
}

fn initialize_hashing_parameters() -> HashingParameters {
    INITIALIZATIONS.fetch_add(1, Ordering::Relaxed);
    HashingParameters::new(&HashingConfig::from_env(), &mut SystemEntropy::default())
}

#[inline(always)]
pub fn get() -> &'static HashingParameters {
    if STORAGE.state.load(Ordering::Acquire) != READY {
        init_slow();
    }
    // SAFETY: READY is final and was published with `Release` after the write.
    unsafe { (*STORAGE.parameters.get()).assume_init_ref() }
}

/// Lets a racing thread retry if the initializer panics.
struct Unlock();

impl Drop for Unlock {
    fn drop(&mut self) {
        STORAGE.state.store(UNINIT, Ordering::Release);
    }
}

#[cold]
#[inline(never)]
fn init_slow() {
    loop {
        match STORAGE.state.compare_exchange_weak(
            UNINIT,
            RUNNING,
            Ordering::Acquire,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                let unlock = Unlock();
                let parameters = initialize_hashing_parameters();
                // SAFETY: this thread holds RUNNING exclusively.
                unsafe { (*STORAGE.parameters.get()).write(parameters) };
                core::mem::forget(unlock);
                STORAGE.state.store(READY, Ordering::Release);
                return;
            }
            Err(READY) => return,
            _ => spin_loop(),
        }
    }
}
