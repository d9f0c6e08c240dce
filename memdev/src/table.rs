//! Fixed table of storage units
//!
//! The table is created once from a [`Config`] and never grows or shrinks.
//! Units are identified by a sequential [`UnitId`] and exposed under the name
//! `{name_prefix}{index}`. Dropping the table tears every unit down.

use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::error::UnitError;
use crate::idgen::{IdGen, UnitId};
use crate::session::Session;
use crate::unit::StorageUnit;

pub struct UnitTable {
    units: Vec<Arc<StorageUnit>>,
}

impl UnitTable {
    /// Validate `config` and allocate its units
    ///
    /// A non-positive unit count is a configuration error and nothing is
    /// allocated.
    pub fn new(config: &Config) -> Result<Self, UnitError> {
        config.validate()?;
        let count = usize::try_from(config.unit_count)
            .map_err(|_| crate::config::ConfigError::InvalidUnitCount(config.unit_count))?;

        let idgen = IdGen::default();
        let mut units = Vec::with_capacity(count);
        for index in 0..count {
            let name = format!("{}{index}", config.name_prefix);
            let unit = StorageUnit::new(
                idgen.get_next(),
                &name,
                config.initial_capacity,
                config.lock_poll(),
            )?;
            units.push(Arc::new(unit));
        }

        info!(
            units = count,
            capacity = config.initial_capacity,
            prefix = %config.name_prefix,
            "unit table created"
        );
        Ok(Self { units })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, id: UnitId) -> Result<&Arc<StorageUnit>, UnitError> {
        self.units
            .get(id.id() as usize)
            .ok_or(UnitError::UnknownId(id))
    }

    pub fn by_name(&self, name: &str) -> Result<&Arc<StorageUnit>, UnitError> {
        self.units
            .iter()
            .find(|unit| unit.name() == name)
            .ok_or_else(|| UnitError::NotFound(name.to_string()))
    }

    /// Bind a new session to the unit `id`
    pub fn open(&self, id: UnitId) -> Result<Session, UnitError> {
        Ok(Session::new(Arc::clone(self.get(id)?)))
    }

    /// Bind a new session to the unit called `name`
    pub fn open_by_name(&self, name: &str) -> Result<Session, UnitError> {
        Ok(Session::new(Arc::clone(self.by_name(name)?)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<StorageUnit>> {
        self.units.iter()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.units.iter().map(|unit| unit.name().to_string()).collect()
    }
}

impl Drop for UnitTable {
    fn drop(&mut self) {
        info!(units = self.units.len(), "unit table destroyed");
    }
}
