// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types shared by every stowage container.

use thiserror::Error;

/// Failure taxonomy shared by every stowage container.
///
/// Success is `Ok(..)`; every failure is returned to the immediate caller and
/// leaves the container in its last valid state.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum StowageError {
    /// A required argument was malformed: zero-sized element type,
    /// out-of-range index or id, inverted range.
    #[error("invalid parameter")]
    InvalidParam = 1,

    /// The active allocator could not provide, grow or duplicate memory.
    #[error("memory allocation failed")]
    AllocFailed = 2,

    /// An index fell outside the live range.
    ///
    /// Array operations report index violations as [`StowageError::InvalidParam`];
    /// this variant exists for callers that want to disambiguate.
    #[error("index out of bounds")]
    OutOfBounds = 3,

    /// Pop or remove attempted on an empty array.
    #[error("container is empty")]
    Empty = 4,

    /// The requested key does not exist.
    #[error("key not found")]
    NotFound = 5,

    /// The container reached its capacity ceiling.
    #[error("container is full")]
    Full = 6,
}
