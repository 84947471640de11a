// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits injected into the engine so time and credentials can be faked.

pub mod clock;
pub mod token;

pub use clock::{Clock, SystemClock};
pub use token::{TokenGrant, TokenProvider};
