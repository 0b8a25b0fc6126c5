// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{interaction_events, likes, shares};

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Like {
    pub id: i32,
    pub user_id: i32,
    pub post_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = likes)]
pub struct NewLike {
    pub user_id: i32,
    pub post_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = shares)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Share {
    pub id: i32,
    pub user_id: i32,
    pub post_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = shares)]
pub struct NewShare {
    pub user_id: i32,
    pub post_id: i32,
}

/// Kind of action recorded in the interaction log
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize, Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    Like,
    Comment,
    Share,
}

impl InteractionType {
    pub const ALL: [InteractionType; 4] = [
        InteractionType::View,
        InteractionType::Like,
        InteractionType::Comment,
        InteractionType::Share,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::Like => "like",
            InteractionType::Comment => "comment",
            InteractionType::Share => "share",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("invalid interaction type: {0}")]
pub struct InvalidInteractionType(pub String);

impl FromStr for InteractionType {
    type Err = InvalidInteractionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InteractionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| InvalidInteractionType(s.to_string()))
    }
}

impl ToSql<Text, Pg> for InteractionType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for InteractionType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        Ok(raw.parse()?)
    }
}

/// Append-only record of a single view/like/comment/share action
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = interaction_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InteractionEvent {
    pub id: i32,
    pub user_id: i32,
    pub post_id: i32,
    pub interaction_type: InteractionType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = interaction_events)]
pub struct NewInteractionEvent {
    pub user_id: i32,
    pub post_id: i32,
    pub interaction_type: InteractionType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types_only() {
        for kind in InteractionType::ALL {
            assert_eq!(kind.as_str().parse::<InteractionType>().unwrap(), kind);
        }
        assert!("View".parse::<InteractionType>().is_err());
        assert!("bookmark".parse::<InteractionType>().is_err());
        assert!("".parse::<InteractionType>().is_err());
    }
}
