// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Bool;
use serde::{Deserialize, Serialize};

/// Soft-delete state of a post or comment.
///
/// Stored as the `is_deleted` boolean column. The only transition is
/// `Active -> Deleted`; nothing moves a row back.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize, Deserialize,
)]
#[diesel(sql_type = Bool)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted,
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        self == Lifecycle::Active
    }

    pub fn is_deleted(self) -> bool {
        self == Lifecycle::Deleted
    }

    /// Apply a soft delete. Deleting an already deleted row keeps it deleted.
    pub fn delete(self) -> Self {
        Lifecycle::Deleted
    }
}

impl ToSql<Bool, Pg> for Lifecycle {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match self {
            Lifecycle::Active => <bool as ToSql<Bool, Pg>>::to_sql(&false, out),
            Lifecycle::Deleted => <bool as ToSql<Bool, Pg>>::to_sql(&true, out),
        }
    }
}

impl FromSql<Bool, Pg> for Lifecycle {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let is_deleted = <bool as FromSql<Bool, Pg>>::from_sql(bytes)?;
        Ok(if is_deleted {
            Lifecycle::Deleted
        } else {
            Lifecycle::Active
        })
    }
}
