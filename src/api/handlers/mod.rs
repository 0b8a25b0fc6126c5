// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod analytics;
pub mod content;
pub mod health;
pub mod interactions;
