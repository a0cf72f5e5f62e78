//! Execution outcome vocabulary.
//!
//! The engine reports every VM operation as a [`VmResult`]: an integer
//! classification plus a diagnostic message. This crate only defines the
//! vocabulary; results are produced by the engine and interpreted by the
//! embedder.

use serde::{Deserialize, Serialize};

/// Classification of a VM operation outcome.
///
/// Values are stable and interpreted numerically by embedders; new codes are
/// appended, existing values never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[repr(u32)]
pub enum ErrCode {
    /// Clean completion.
    Success = 0x00,
    /// Deliberate early termination requested by the guest or a host
    /// function. Non-exceptional: [`VmResult::is_ok`] treats it as success.
    Terminated = 0x01,
    /// Generic execution failure.
    Failed = 0x02,
    /// Execution exceeded the configured cost limit.
    CostLimitExceeded = 0x03,
    /// An operation was invoked out of the VM lifecycle order.
    WrongVmWorkflow = 0x04,
    /// The requested function does not exist in the instantiated module.
    FuncNotFound = 0x05,
}

impl From<ErrCode> for u32 {
    fn from(code: ErrCode) -> u32 {
        code as u32
    }
}

/// Outcome of a VM operation.
///
/// `is_ok` deliberately conflates clean success and early termination into
/// one success category; embedders needing the finer distinction consult
/// [`code`](Self::code) and [`message`](Self::message).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmResult {
    code: u32,
    message: String,
}

impl VmResult {
    /// Clean success.
    pub fn success() -> Self {
        Self {
            code: ErrCode::Success.into(),
            message: "success".to_string(),
        }
    }

    /// Deliberate early termination.
    pub fn terminated() -> Self {
        Self {
            code: ErrCode::Terminated.into(),
            message: "terminated".to_string(),
        }
    }

    /// Failure with a typed classification.
    pub fn fail(code: ErrCode, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Outcome with a raw classification value. The engine uses this for
    /// codes minted after this crate was compiled.
    pub fn from_raw(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// True iff the code denotes clean success or deliberate early
    /// termination.
    pub fn is_ok(&self) -> bool {
        self.code == ErrCode::Success as u32 || self.code == ErrCode::Terminated as u32
    }

    /// Integer classification; interpreted by value.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Diagnostic message, borrowed for the lifetime of this result.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for VmResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:#04x}] {}", self.code, self.message)
    }
}
