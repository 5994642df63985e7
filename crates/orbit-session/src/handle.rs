use std::fmt;
use std::num::NonZeroU64;

/// Raw value handed across the JNI boundary when no session exists.
pub const NO_SESSION_RAW: i64 = 0;

/// Token for one live engine session.
///
/// "No session" is `Option<SessionHandle>::None` on the Rust side and
/// [`NO_SESSION_RAW`] on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionHandle(NonZeroU64);

impl SessionHandle {
    pub fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Decode a handle received from Java. Zero and negative values are
    /// treated as "no session".
    pub fn from_raw(raw: i64) -> Option<Self> {
        if raw <= 0 {
            return None;
        }
        NonZeroU64::new(raw as u64).map(Self)
    }

    pub fn into_raw(self) -> i64 {
        // Handles are minted from a counter starting at 1; they never reach
        // i64::MAX in a process lifetime.
        i64::try_from(self.0.get()).unwrap_or(i64::MAX)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Encode an optional handle for Java, using the sentinel for `None`.
pub fn to_raw(handle: Option<SessionHandle>) -> i64 {
    handle.map_or(NO_SESSION_RAW, SessionHandle::into_raw)
}
