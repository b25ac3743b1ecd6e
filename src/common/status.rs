// src/common/status.rs

use core::fmt;

/// A status code as returned by the remote sensor service (`status_t`).
///
/// Zero is success, everything else is a negative errno-style value.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Status(i32);

impl Status {
    pub const OK: Status = Status(0);
    pub const PERMISSION_DENIED: Status = Status(-1); // -EPERM
    pub const NAME_NOT_FOUND: Status = Status(-2); // -ENOENT
    pub const IO_ERROR: Status = Status(-5); // -EIO
    pub const WOULD_BLOCK: Status = Status(-11); // -EWOULDBLOCK
    pub const NO_MEMORY: Status = Status(-12); // -ENOMEM
    pub const NO_INIT: Status = Status(-19); // -ENODEV
    pub const BAD_VALUE: Status = Status(-22); // -EINVAL
    pub const DEAD_OBJECT: Status = Status(-32); // -EPIPE
    pub const INVALID_OPERATION: Status = Status(-38); // -ENOSYS
    pub const TIMED_OUT: Status = Status(-110); // -ETIMEDOUT
    pub const UNKNOWN_ERROR: Status = Status(i32::MIN);

    #[inline]
    pub const fn from_raw(code: i32) -> Self {
        Status(code)
    }

    #[inline]
    pub const fn code(&self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.0 == 0
    }

    /// `Ok(())` for [`Status::OK`], otherwise the status itself as the error.
    pub fn into_result(self) -> Result<(), Status> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Status::OK => "OK",
            Status::PERMISSION_DENIED => "PERMISSION_DENIED",
            Status::NAME_NOT_FOUND => "NAME_NOT_FOUND",
            Status::IO_ERROR => "IO_ERROR",
            Status::WOULD_BLOCK => "WOULD_BLOCK",
            Status::NO_MEMORY => "NO_MEMORY",
            Status::NO_INIT => "NO_INIT",
            Status::BAD_VALUE => "BAD_VALUE",
            Status::DEAD_OBJECT => "DEAD_OBJECT",
            Status::INVALID_OPERATION => "INVALID_OPERATION",
            Status::TIMED_OUT => "TIMED_OUT",
            Status::UNKNOWN_ERROR => "UNKNOWN_ERROR",
            _ => return None,
        };
        Some(name)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::OK
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status(code)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "status {}", self.0),
        }
    }
}
