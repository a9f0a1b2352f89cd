// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for works on disk.
//!
//! The store module reads/writes the work folder format (JSON documents per work and per
//! user) that backs [`crate::backend::MemoryBackend`] when it runs with a folder.

pub mod work_folder;

pub use work_folder::{StoreError, WorkFolder, WriteDurability};
