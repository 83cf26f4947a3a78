//! Configuration validation.

use std::collections::HashSet;

use super::Config;
use crate::error::{MappingError, Result};
use crate::mapping::store_type;
use crate::registry::is_builtin_store_type;

fn check_not_builtin(name: &str) -> Result<()> {
    if is_builtin_store_type(name) {
        return Err(MappingError::Config(format!(
            "type '{}' collides with a built-in PostgreSQL type",
            name
        )));
    }
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    config.version()?;

    let mut names = HashSet::new();

    for (i, e) in config.enums.iter().enumerate() {
        if e.name.trim().is_empty() {
            return Err(MappingError::Config(format!("enums[{}].name is required", i)));
        }
        if !names.insert(e.store_type()) {
            return Err(MappingError::Config(format!(
                "type '{}' is configured more than once",
                e.store_type()
            )));
        }
        check_not_builtin(&e.store_type())?;
        if e.labels.is_empty() {
            return Err(MappingError::Config(format!(
                "enum '{}' needs at least one label",
                e.name
            )));
        }
        let mut labels = HashSet::new();
        for label in &e.labels {
            if label.is_empty() {
                return Err(MappingError::Config(format!(
                    "enum '{}' has an empty label",
                    e.name
                )));
            }
            if !labels.insert(label.as_str()) {
                return Err(MappingError::Config(format!(
                    "enum '{}' repeats label '{}'",
                    e.name, label
                )));
            }
        }
    }

    let range_names: HashSet<String> = config.ranges.iter().map(|r| r.store_type()).collect();
    for (i, r) in config.ranges.iter().enumerate() {
        if r.name.trim().is_empty() {
            return Err(MappingError::Config(format!("ranges[{}].name is required", i)));
        }
        if !names.insert(r.store_type()) {
            return Err(MappingError::Config(format!(
                "type '{}' is configured more than once",
                r.store_type()
            )));
        }
        check_not_builtin(&r.store_type())?;
        check_not_builtin(&r.multirange_store_type())?;
        if let Some(multirange) = &r.multirange {
            if multirange.trim().is_empty() {
                return Err(MappingError::Config(format!(
                    "range '{}' has an empty multirange name",
                    r.name
                )));
            }
        }

        let subtype = store_type::parse(&r.subtype).map_err(|_| {
            MappingError::Config(format!(
                "range '{}' has an invalid subtype '{}'",
                r.name, r.subtype
            ))
        })?;
        if subtype.array_rank > 0
            || subtype.base.ends_with("range")
            || range_names.contains(&subtype.base)
        {
            return Err(MappingError::Config(format!(
                "range '{}' cannot have '{}' as its subtype",
                r.name, r.subtype
            )));
        }
    }

    Ok(())
}
