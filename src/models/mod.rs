// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! API request and response models.

pub mod event;

pub use event::{CreateEventRequest, CreateEventResponse};
