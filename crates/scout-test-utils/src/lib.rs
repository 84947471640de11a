// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for scout integration tests.
//!
//! Provides deterministic stand-ins for the engine's seams so tests run
//! without wall-clock waits or a live identity provider.
//!
//! # Components
//!
//! - [`FakeClock`] - Manually advanced clock
//! - [`CountingTokenProvider`] - Token provider that counts its calls
//! - [`zip_archive`] - In-memory ZIP builder for archive fixtures

pub mod archive;
pub mod clock;
pub mod token;

pub use archive::{zip_archive, zip_archive_with_dirs};
pub use clock::FakeClock;
pub use token::CountingTokenProvider;
