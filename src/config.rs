// Predicate Pushdown Library for JDBC-style Table Connectors
// Copyright 2026 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Connector configuration carried through job properties.
//!
//! The host engine describes a table with a flat map of string properties.
//! Connector settings live under the `connector.` prefix and are copied into
//! the job properties the connector reads at execution time. The declared
//! columns arrive separately, as the comma-separated `columns` job property.

use crate::decompose::PredicateDecomposer;
use crate::error::Error;
use crate::operator::OperatorSet;
use crate::sql::SqlStyle;
use std::collections::HashMap;
use typed_builder::TypedBuilder;

/// Flat string properties describing a table or a job.
pub type Properties = HashMap<String, String>;

/// Job property listing the table's declared columns, comma-separated.
pub const LIST_COLUMNS: &str = "columns";

/// Prefix shared by every connector property.
pub const CONFIG_PREFIX: &str = "connector.";

/// Connector property keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Remote database family, e.g. `MYSQL` or `POSTGRES`
    DatabaseType,
    JdbcUrl,
    JdbcDriver,
    Username,
    Password,
    /// Query whose rows form the table
    Query,
    /// Remote table name, used when no query is given
    Table,
    FetchSize,
    /// Comma-separated operators the remote source supports
    PushdownOperators,
    /// WHERE-clause fragment of the pushed predicate
    PushdownFilter,
    /// JSON form of the pushed predicate
    PushdownFilterJson,
}

impl ConfigKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::DatabaseType => "connector.database.type",
            ConfigKey::JdbcUrl => "connector.jdbc.url",
            ConfigKey::JdbcDriver => "connector.jdbc.driver",
            ConfigKey::Username => "connector.dbcp.username",
            ConfigKey::Password => "connector.dbcp.password",
            ConfigKey::Query => "connector.query",
            ConfigKey::Table => "connector.table",
            ConfigKey::FetchSize => "connector.jdbc.fetch.size",
            ConfigKey::PushdownOperators => "connector.pushdown.operators",
            ConfigKey::PushdownFilter => "connector.pushdown.filter",
            ConfigKey::PushdownFilterJson => "connector.pushdown.filter.json",
        }
    }

    /// Looks up this key in `properties`.
    pub fn get(self, properties: &Properties) -> Option<&str> {
        properties.get(self.as_str()).map(String::as_str)
    }
}

/// Copies every connector property from the table description into the job
/// properties.
///
/// # Errors
///
/// Returns [`Error::MissingProperty`] when the database type, the JDBC URL,
/// or both of the query and table name are absent.
pub fn copy_configuration_to_job(table: &Properties, job: &mut Properties) -> Result<(), Error> {
    for key in [ConfigKey::DatabaseType, ConfigKey::JdbcUrl] {
        if key.get(table).is_none_or(|v| v.trim().is_empty()) {
            return Err(Error::MissingProperty(key.as_str().to_string()));
        }
    }
    if ConfigKey::Query.get(table).is_none() && ConfigKey::Table.get(table).is_none() {
        return Err(Error::MissingProperty(format!(
            "{} or {}",
            ConfigKey::Query.as_str(),
            ConfigKey::Table.as_str()
        )));
    }

    let mut copied = 0;
    for (key, value) in table {
        if key.starts_with(CONFIG_PREFIX) {
            job.insert(key.clone(), value.clone());
            copied += 1;
        }
    }
    log::debug!("Copied {copied} connector properties to job configuration");
    Ok(())
}

/// Splits a comma-separated column list. Tokens are trimmed and empty tokens
/// skipped.
pub fn parse_column_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Settings needed to decompose and render predicates for one table.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ConnectorConfig {
    /// Columns the remote source can filter on
    #[builder(setter(into))]
    pub columns: Vec<String>,
    /// Operators the remote source can evaluate
    #[builder(default = OperatorSet::all())]
    pub operators: OperatorSet,
    /// Identifier quoting of the remote dialect
    #[builder(default)]
    pub sql_style: SqlStyle,
}

impl ConnectorConfig {
    /// Reads the connector configuration from job properties.
    ///
    /// # Errors
    ///
    /// Fails when the column list is absent or empty, or when the operator
    /// list names an unknown operator.
    pub fn from_job_properties(job: &Properties) -> Result<Self, Error> {
        let columns = job
            .get(LIST_COLUMNS)
            .map(|list| parse_column_list(list))
            .ok_or_else(|| Error::MissingProperty(LIST_COLUMNS.to_string()))?;
        if columns.is_empty() {
            return Err(Error::EmptyColumnList);
        }

        let operators = match ConfigKey::PushdownOperators.get(job) {
            Some(list) => OperatorSet::parse_list(list)?,
            None => OperatorSet::all(),
        };

        let sql_style = ConfigKey::DatabaseType
            .get(job)
            .map(SqlStyle::for_database_type)
            .unwrap_or_default();

        Ok(ConnectorConfig {
            columns,
            operators,
            sql_style,
        })
    }

    /// Creates a decomposer for this table.
    pub fn decomposer(&self) -> Result<PredicateDecomposer, Error> {
        PredicateDecomposer::new(self.columns.iter().cloned(), self.operators.clone())
    }
}
