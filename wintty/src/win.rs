use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::mem;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::io::RawHandle;

use winapi::shared::minwindef::{BOOL, DWORD, FARPROC, LPVOID, MAX_PATH, ULONG};
use winapi::shared::ntdef::{NTSTATUS, PVOID};
use winapi::um::libloaderapi::{GetModuleHandleW, GetProcAddress};
use winapi::um::minwinbase::{FILE_INFO_BY_HANDLE_CLASS, FileNameInfo};
use winapi::um::winnt::{HANDLE, LPCSTR};
use winapi_util::{HandleRef, console, file};

use error::Error;
use name;

/// `OBJECT_INFORMATION_CLASS::ObjectNameInformation`.
const OBJECT_NAME_INFORMATION: u32 = 1;

type NtQueryObjectFn = unsafe extern "system" fn(
    HANDLE,
    u32,
    PVOID,
    ULONG,
    *mut ULONG,
) -> NTSTATUS;

type RtlNtStatusToDosErrorFn = unsafe extern "system" fn(NTSTATUS) -> ULONG;

type GetFileInformationByHandleExFn = unsafe extern "system" fn(
    HANDLE,
    FILE_INFO_BY_HANDLE_CLASS,
    LPVOID,
    DWORD,
) -> BOOL;

lazy_static! {
    static ref ENTRY_POINTS: EntryPoints = EntryPoints::resolve();
}

/// A buffer for the name queries. `FILE_NAME_INFO` starts with a `DWORD`, so
/// the wide characters must be at least 4 byte aligned.
#[repr(C, align(8))]
struct WideBuf<T>(T);

/// Returns true if and only if the given handle refers to a Windows console.
///
/// Any failure to query the console mode, including an invalid or closed
/// handle, yields `false`.
pub fn is_terminal(handle: RawHandle) -> bool {
    let h = unsafe { HandleRef::from_raw_handle(handle) };
    console::mode(h).is_ok()
}

/// Returns true if and only if the given handle refers to a pipe backing an
/// MSYS2 or Cygwin pseudo terminal.
///
/// This uses the process wide entry point table, which is resolved the first
/// time it's needed.
pub fn is_emulated_terminal(handle: RawHandle) -> bool {
    EntryPoints::global().is_emulated_terminal(handle)
}

/// The optional OS entry points used to retrieve the kernel object name of a
/// handle.
///
/// Neither `NtQueryObject` nor `GetFileInformationByHandleEx` is guaranteed
/// to exist, so both are looked up at runtime. A missing entry point disables
/// the corresponding strategy.
#[derive(Clone, Copy)]
pub struct EntryPoints {
    nt_query_object: Option<NtQueryObjectFn>,
    rtl_nt_status_to_dos_error: Option<RtlNtStatusToDosErrorFn>,
    get_file_information_by_handle_ex: Option<GetFileInformationByHandleExFn>,
}

impl fmt::Debug for EntryPoints {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EntryPoints")
            .field("nt_query_object", &self.nt_query_object.is_some())
            .field(
                "rtl_nt_status_to_dos_error",
                &self.rtl_nt_status_to_dos_error.is_some())
            .field(
                "get_file_information_by_handle_ex",
                &self.get_file_information_by_handle_ex.is_some())
            .finish()
    }
}

impl EntryPoints {
    /// Look up the name query entry points, and the `NTSTATUS` converter, in
    /// the modules already mapped into this process.
    pub fn resolve() -> EntryPoints {
        let eps = unsafe {
            EntryPoints {
                nt_query_object:
                    proc_address("ntdll.dll", b"NtQueryObject\0")
                        .map(|p| {
                            mem::transmute::<FARPROC, NtQueryObjectFn>(p)
                        }),
                rtl_nt_status_to_dos_error:
                    proc_address("ntdll.dll", b"RtlNtStatusToDosError\0")
                        .map(|p| {
                            mem::transmute::<
                                FARPROC,
                                RtlNtStatusToDosErrorFn,
                            >(p)
                        }),
                get_file_information_by_handle_ex:
                    proc_address(
                        "kernel32.dll", b"GetFileInformationByHandleEx\0")
                        .map(|p| {
                            mem::transmute::<
                                FARPROC,
                                GetFileInformationByHandleExFn,
                            >(p)
                        }),
            }
        };
        debug!("resolved name query entry points: {:?}", eps);
        eps
    }

    /// Returns the process wide entry point table.
    pub fn global() -> &'static EntryPoints {
        &*ENTRY_POINTS
    }

    /// Disable the `NtQueryObject` strategy.
    pub fn without_object_query(mut self) -> EntryPoints {
        self.nt_query_object = None;
        self
    }

    /// Disable the `GetFileInformationByHandleEx` strategy.
    pub fn without_file_info_query(mut self) -> EntryPoints {
        self.get_file_information_by_handle_ex = None;
        self
    }

    /// Returns true if and only if the given handle refers to a pipe backing
    /// an MSYS2 or Cygwin pseudo terminal, using only the strategies enabled
    /// in this table.
    ///
    /// `NtQueryObject` is tried first. `GetFileInformationByHandleEx` is only
    /// tried if that fails or produces an empty name.
    pub fn is_emulated_terminal(&self, handle: RawHandle) -> bool {
        let strategies: [
            fn(&EntryPoints, RawHandle) -> Result<String, Error>;
            2
        ] = [name_by_object, name_by_file_info];
        name::classify_first(
            strategies.iter().map(|strategy| strategy(self, handle)))
    }

    /// Convert a failed `NTSTATUS` into an I/O error carrying the equivalent
    /// Win32 error code. If `RtlNtStatusToDosError` is missing, the status
    /// is only kept in the message.
    fn status_error(&self, status: NTSTATUS) -> io::Error {
        match self.rtl_nt_status_to_dos_error {
            Some(convert) => {
                let code = unsafe { convert(status) };
                io::Error::from_raw_os_error(code as i32)
            }
            None => io::Error::new(
                io::ErrorKind::Other,
                format!("NtQueryObject failed with NTSTATUS 0x{:08X}", status),
            ),
        }
    }
}

/// Find an exported symbol in a module that is already loaded. Both
/// `ntdll.dll` and `kernel32.dll` are mapped into every Win32 process.
unsafe fn proc_address(module: &str, symbol: &[u8]) -> Option<FARPROC> {
    let wide: Vec<u16> =
        OsStr::new(module).encode_wide().chain(Some(0)).collect();
    let module = GetModuleHandleW(wide.as_ptr());
    if module.is_null() {
        return None;
    }
    let addr = GetProcAddress(module, symbol.as_ptr() as LPCSTR);
    if addr.is_null() {
        None
    } else {
        Some(addr)
    }
}

/// Retrieve the full object name of a handle with the undocumented
/// `NtQueryObject`. This works on every version of Windows, including those
/// without `GetFileInformationByHandleEx`.
fn name_by_object(
    eps: &EntryPoints,
    handle: RawHandle,
) -> Result<String, Error> {
    let query = match eps.nt_query_object {
        Some(query) => query,
        None => return Err(Error::Unsupported("ntdll.dll: NtQueryObject")),
    };
    let mut buf = WideBuf([0u16; 2 * MAX_PATH]);
    let mut returned: ULONG = 0;
    let status = unsafe {
        query(
            handle as HANDLE,
            OBJECT_NAME_INFORMATION,
            buf.0.as_mut_ptr() as PVOID,
            (2 * buf.0.len()) as ULONG,
            &mut returned,
        )
    };
    if status != 0 {
        return Err(Error::Query(eps.status_error(status)));
    }
    name::object_name(&buf.0, returned)
}

/// Retrieve the file name of a pipe handle with
/// `GetFileInformationByHandleEx`. Handles that aren't pipes are rejected
/// before the name is queried.
fn name_by_file_info(
    eps: &EntryPoints,
    handle: RawHandle,
) -> Result<String, Error> {
    let get_info = match eps.get_file_information_by_handle_ex {
        Some(get_info) => get_info,
        None => {
            return Err(Error::Unsupported(
                "kernel32.dll: GetFileInformationByHandleEx"));
        }
    };
    let h = unsafe { HandleRef::from_raw_handle(handle) };
    if !file::typ(h)?.is_pipe() {
        return Err(Error::NotPipe);
    }
    let mut buf = WideBuf([0u16; 2 + MAX_PATH]);
    let ok = unsafe {
        get_info(
            handle as HANDLE,
            FileNameInfo,
            buf.0.as_mut_ptr() as LPVOID,
            (2 * buf.0.len()) as DWORD,
        )
    };
    if ok == 0 {
        return Err(Error::Query(io::Error::last_os_error()));
    }
    name::file_name(&buf.0)
}
