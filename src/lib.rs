// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Genkou: manuscript core for serialized fiction.
//!
//! Ruby-aware character accounting ([`text`]), a chapter reconciler that keeps the active
//! chapter and chapter order consistent against an eventually-consistent document backend
//! ([`reconcile`]), and the [`workspace`] context that wires subscriptions, the reconciler and
//! the memo board together for one open work. The [`shelf`] lists the works a writer owns.

pub mod backend;
pub mod config;
pub mod memo;
pub mod model;
pub mod reconcile;
pub mod shelf;
pub mod store;
pub mod text;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_utils;
