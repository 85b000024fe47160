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

//! Storage handler glue between a host query engine and the connector.
//!
//! # Integration Points
//!
//! 1. **Job configuration**: `configure_table_job_properties()` and
//!    `configure_input_job_properties()` copy the connector settings of a
//!    table into the job the connector runs in.
//! 2. **Predicate decomposition**: `decompose_predicate()` splits the
//!    engine's filter against the job's declared columns.
//! 3. **Filter installation**: `install_pushed_filter()` stores the pushed
//!    predicate in the job properties, where the connector picks it up when
//!    issuing its remote query. The engine keeps the residual as a local
//!    post-filter.
//!
//! # Example
//!
//! ```
//! use predicate_pushdown::config::{ConfigKey, Properties};
//! use predicate_pushdown::expr::{Predicate, col};
//! use predicate_pushdown::handler::{JdbcStorageHandler, StoragePredicateHandler};
//!
//! let handler = JdbcStorageHandler::new();
//! let mut job = Properties::new();
//! job.insert("columns".to_string(), "id,name".to_string());
//!
//! let predicate = Predicate::from(col("id").gt(10).and(col("other").eq(1)));
//! let decomposed = handler.decompose_predicate(&job, &predicate).unwrap();
//! handler.install_pushed_filter(&mut job, &decomposed).unwrap();
//!
//! assert_eq!(ConfigKey::PushdownFilter.get(&job), Some(r#""id" > 10"#));
//! ```

use crate::config::{ConfigKey, ConnectorConfig, Properties, copy_configuration_to_job};
use crate::decompose::DecomposedPredicate;
use crate::error::Error;
use crate::expr::Predicate;
use crate::sql::{SqlStyle, to_sql};

/// Host-facing hook for splitting a filter into pushed and residual parts.
pub trait StoragePredicateHandler {
    /// Decomposes `predicate` using the settings found in `job`.
    fn decompose_predicate(
        &self,
        job: &Properties,
        predicate: &Predicate,
    ) -> Result<DecomposedPredicate, Error>;
}

/// Storage handler for tables backed by a JDBC-style remote source.
#[derive(Debug, Clone, Copy, Default)]
pub struct JdbcStorageHandler;

impl JdbcStorageHandler {
    pub fn new() -> Self {
        Self
    }

    /// Copies the connector configuration of a table into its job.
    pub fn configure_table_job_properties(
        &self,
        table: &Properties,
        job: &mut Properties,
    ) -> Result<(), Error> {
        copy_configuration_to_job(table, job)
    }

    /// Copies the connector configuration of a table into a read job.
    pub fn configure_input_job_properties(
        &self,
        table: &Properties,
        job: &mut Properties,
    ) -> Result<(), Error> {
        copy_configuration_to_job(table, job)
    }

    /// Writes need no connector configuration.
    pub fn configure_output_job_properties(&self, _table: &Properties, _job: &mut Properties) {}

    /// Stores the pushed part of `decomposed` in the job properties, both as
    /// a WHERE-clause fragment and as JSON. Any previously installed filter
    /// is removed when nothing is pushed.
    pub fn install_pushed_filter(
        &self,
        job: &mut Properties,
        decomposed: &DecomposedPredicate,
    ) -> Result<(), Error> {
        let Some(pushed) = &decomposed.pushed else {
            job.remove(ConfigKey::PushdownFilter.as_str());
            job.remove(ConfigKey::PushdownFilterJson.as_str());
            return Ok(());
        };

        let style = ConfigKey::DatabaseType
            .get(job)
            .map(SqlStyle::for_database_type)
            .unwrap_or_default();
        let clause = to_sql(pushed, &style)?;
        let json = pushed.to_json()?;

        log::debug!("Installing pushed filter: {clause}");
        job.insert(ConfigKey::PushdownFilter.as_str().to_string(), clause);
        job.insert(ConfigKey::PushdownFilterJson.as_str().to_string(), json);
        Ok(())
    }

    /// Reads back the pushed predicate installed in `job`, if any.
    pub fn pushed_filter(&self, job: &Properties) -> Result<Option<Predicate>, Error> {
        ConfigKey::PushdownFilterJson
            .get(job)
            .map(Predicate::from_json)
            .transpose()
    }
}

impl StoragePredicateHandler for JdbcStorageHandler {
    fn decompose_predicate(
        &self,
        job: &Properties,
        predicate: &Predicate,
    ) -> Result<DecomposedPredicate, Error> {
        let config = ConnectorConfig::from_job_properties(job)?;
        for column in &config.columns {
            log::info!("Allowing pushdown on column: {column}");
        }

        let decomposed = config.decomposer()?.decompose(predicate);
        for condition in &decomposed.search_conditions {
            log::info!("Conditions fetched are: {condition}");
        }
        if let Some(pushed) = &decomposed.pushed {
            log::info!("Predicates pushed: {pushed}");
        }
        if let Some(residual) = &decomposed.residual {
            log::info!("Predicates not pushed: {residual}");
        }
        Ok(decomposed)
    }
}
