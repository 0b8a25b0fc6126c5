// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Body returned by mutations whose only result is success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl From<bool> for SuccessResponse {
    fn from(success: bool) -> Self {
        Self { success }
    }
}
