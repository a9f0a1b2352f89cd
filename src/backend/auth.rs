// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::UserId;

/// Resolves the signed-in user on demand.
pub trait AuthProvider {
    fn current_user(&self) -> Option<UserId>;
}

/// Fixed identity, for local sessions and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAuth {
    user: Option<UserId>,
}

impl StaticAuth {
    pub fn signed_in(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}
