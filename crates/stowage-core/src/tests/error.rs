// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::StowageError;

#[test]
fn test_error_messages() {
    assert_eq!(StowageError::InvalidParam.to_string(), "invalid parameter");
    assert_eq!(StowageError::AllocFailed.to_string(), "memory allocation failed");
    assert_eq!(StowageError::OutOfBounds.to_string(), "index out of bounds");
    assert_eq!(StowageError::Empty.to_string(), "container is empty");
    assert_eq!(StowageError::NotFound.to_string(), "key not found");
    assert_eq!(StowageError::Full.to_string(), "container is full");
}

#[test]
fn test_error_discriminants_are_stable() {
    assert_eq!(StowageError::InvalidParam as u8, 1);
    assert_eq!(StowageError::Full as u8, 6);
}
