// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Hidden decoy field check.

/// Verdict on the decoy field of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoneypotVerdict {
    Human,
    LikelyAutomated,
}

/// Any non-empty decoy value marks the submission as automated.
pub fn inspect(field: Option<&str>) -> HoneypotVerdict {
    match field {
        Some(value) if !value.is_empty() => HoneypotVerdict::LikelyAutomated,
        _ => HoneypotVerdict::Human,
    }
}
