//! Engine backed by a shared library exposing the snes_spc C API.
//!
//! ```c
//! SNES_SPC*   spc_new(void);
//! void        spc_delete(SNES_SPC*);
//! const char* spc_load_spc(SNES_SPC*, const void* data, long size);
//! const char* spc_play(SNES_SPC*, int count, short* out);
//! void        spc_clear_echo(SNES_SPC*);   // optional
//! ```
//!
//! Functions returning `const char*` return NULL on success and an error
//! message otherwise.

use std::ffi::{c_char, c_int, c_long, c_short, c_void, CStr, OsStr, OsString};
use std::ptr::NonNull;

use libloading::{Library, Symbol};

use super::EmulationEngine;
use crate::error::{RenderError, Result};

type SpcNew = unsafe extern "C" fn() -> *mut c_void;
type SpcDelete = unsafe extern "C" fn(*mut c_void);
type SpcLoadSpc = unsafe extern "C" fn(*mut c_void, *const c_void, c_long) -> *const c_char;
type SpcPlay = unsafe extern "C" fn(*mut c_void, c_int, *mut c_short) -> *const c_char;
type SpcClearEcho = unsafe extern "C" fn(*mut c_void);

/// Platform file name of the default engine library (`libsnes_spc.so`, `snes_spc.dll`, ...).
pub fn default_library_name() -> OsString {
    libloading::library_filename("snes_spc")
}

pub struct NativeEngine {
    handle: NonNull<c_void>,
    delete: SpcDelete,
    load_spc: SpcLoadSpc,
    play: SpcPlay,
    clear_echo: Option<SpcClearEcho>,
    // must be dropped after `handle` is released
    _library: Library,
}

impl NativeEngine {
    pub fn open<P: AsRef<OsStr>>(path: P) -> Result<NativeEngine> {
        let path = path.as_ref();
        log::info!("loading engine library {}", path.to_string_lossy());

        let library = unsafe { Library::new(path)? };
        let (new, delete, load_spc, play, clear_echo) = unsafe {
            let new: Symbol<SpcNew> = library.get(b"spc_new\0")?;
            let delete: Symbol<SpcDelete> = library.get(b"spc_delete\0")?;
            let load_spc: Symbol<SpcLoadSpc> = library.get(b"spc_load_spc\0")?;
            let play: Symbol<SpcPlay> = library.get(b"spc_play\0")?;
            let clear_echo = library
                .get::<SpcClearEcho>(b"spc_clear_echo\0")
                .ok()
                .map(|symbol| *symbol);
            (*new, *delete, *load_spc, *play, clear_echo)
        };

        let handle = NonNull::new(unsafe { new() })
            .ok_or_else(|| RenderError::EngineFault("spc_new returned null".to_string()))?;

        Ok(NativeEngine {
            handle,
            delete,
            load_spc,
            play,
            clear_echo,
            _library: library,
        })
    }
}

fn check(function: &str, err: *const c_char) -> Result<()> {
    if err.is_null() {
        return Ok(());
    }

    let message = unsafe { CStr::from_ptr(err) }.to_string_lossy();
    Err(RenderError::EngineFault(format!("{}: {}", function, message)))
}

impl EmulationEngine for NativeEngine {
    fn load(&mut self, snapshot: &[u8]) -> Result<()> {
        let size = c_long::try_from(snapshot.len())
            .map_err(|_| RenderError::EngineFault("snapshot too large".to_string()))?;

        let err = unsafe {
            (self.load_spc)(self.handle.as_ptr(), snapshot.as_ptr() as *const c_void, size)
        };
        check("spc_load_spc", err)?;

        if let Some(clear_echo) = self.clear_echo {
            unsafe { clear_echo(self.handle.as_ptr()) };
        }

        Ok(())
    }

    fn play(&mut self, out: &mut [i16]) -> Result<()> {
        let count = c_int::try_from(out.len())
            .map_err(|_| RenderError::EngineFault("window too large".to_string()))?;

        let err = unsafe { (self.play)(self.handle.as_ptr(), count, out.as_mut_ptr()) };
        check("spc_play", err)
    }
}

impl Drop for NativeEngine {
    fn drop(&mut self) {
        unsafe { (self.delete)(self.handle.as_ptr()) };
    }
}
