use crate::errors::{ReapyError, ReapyResult};
use std::ffi::{c_char, CStr, CString};

/// Convert string to CString for passing to low-level.
///
/// Fails on interior nul bytes.
pub fn as_c_string(value: impl Into<String>) -> ReapyResult<CString> {
    let value: String = value.into();
    CString::new(value).map_err(|e| ReapyError::InvalidString(e.to_string()))
}

/// Convert pointer to CStr to String.
///
/// # Safety
///
/// `ptr` must be null or point to nul-terminated memory.
pub unsafe fn as_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

/// Zeroed buffer for host functions writing strings.
pub fn make_string_buf(size: usize) -> Vec<u8> {
    vec![0; size]
}

/// Read string written by host into buffer.
pub fn buf_to_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}
