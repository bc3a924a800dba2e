//! Diagnostic bitmask of the condition categories behind a decision
//!
//! A bit is recorded when its matcher returned `false` or when the rule
//! is a deny rule (`allow = false`). A set bit therefore means "this
//! category took part in a negative outcome", not "this category failed".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Condition category flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBits(u8);

impl ErrorBits {
    pub const NONE: ErrorBits = ErrorBits(0);
    pub const USERS: ErrorBits = ErrorBits(1);
    pub const IPS: ErrorBits = ErrorBits(1 << 1);
    pub const ROLES: ErrorBits = ErrorBits(1 << 2);
    pub const CUSTOM: ErrorBits = ErrorBits(1 << 3);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: ErrorBits) -> bool {
        self.0 & other.0 == other.0
    }

    /// Record `bit` if the matcher result is `false` or the rule denies.
    ///
    /// Returns `value` unchanged so it can feed the AND-combination.
    pub fn record_if_failed(&mut self, value: bool, bit: ErrorBits, allow: bool) -> bool {
        if !value || !allow {
            *self |= bit;
        }
        value
    }
}

impl BitOr for ErrorBits {
    type Output = ErrorBits;

    fn bitor(self, rhs: ErrorBits) -> ErrorBits {
        ErrorBits(self.0 | rhs.0)
    }
}

impl BitOrAssign for ErrorBits {
    fn bitor_assign(&mut self, rhs: ErrorBits) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ErrorBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }

        let names = [
            (ErrorBits::USERS, "users"),
            (ErrorBits::IPS, "ips"),
            (ErrorBits::ROLES, "roles"),
            (ErrorBits::CUSTOM, "custom"),
        ];
        let mut first = true;
        for (bit, name) in names {
            if self.contains(bit) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
