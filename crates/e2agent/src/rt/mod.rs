// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reactor runtime primitives: source handles, timers, wake signals and the
//! readiness multiplexer. Linux only (`timerfd`, `eventfd`).

pub mod multiplexer;
pub mod signal;
pub mod source;
pub mod timer;

pub use multiplexer::{Multiplexer, DEFAULT_MAX_EVENTS};
pub use signal::EventFd;
pub use source::SourceHandle;
pub use timer::TimerFd;
