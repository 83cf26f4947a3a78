//! Value kind registry for explicit dependency injection.
//!
//! The [`ValueKindRegistry`] resolves a [`ValueKind`] from an in-memory shape, a
//! store type name, or both. It is explicitly constructed (usually through
//! [`ValueKindRegistry::with_builtins`]) and shared read-only afterwards, typically
//! behind an `Arc`. There is no global registry.
//!
//! Array and list kinds are not stored: they are built on demand around the
//! resolved element kind, so `integer[]`, `_int4` and `Array(I32)` all work for
//! every registered element type.

mod builtins;

pub(crate) use builtins::is_builtin_store_type;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{default_multirange_name, Config};
use crate::core::{ClrShape, DialectTag};
use crate::error::{MappingError, Result};
use crate::literal::{FormatterImpl, FormatterTable, LiteralFormatter};
use crate::mapping::store_type::{self, StoreTypeName};
use crate::mapping::{KindFamily, ValueKind};

/// Registry of value kinds keyed by store type and by shape.
#[derive(Default, Clone)]
pub struct ValueKindRegistry {
    /// Kinds by canonical base store type. The first entry is the default for
    /// lookups that carry no shape.
    by_store_type: HashMap<String, Vec<ValueKind>>,

    /// Default store type per shape.
    by_shape: HashMap<ClrShape, String>,

    /// Formatters of every registered scalar kind.
    formatters: FormatterTable,

    /// Hash of the configuration the registry was built from.
    fingerprint: Option<String>,
}

impl ValueKindRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in PostgreSQL kinds, plus the enums and
    /// ranges named in `config`.
    pub fn with_builtins(config: &Config) -> Result<Self> {
        config.validate()?;
        let version = config.version()?;
        let legacy = config.legacy_timestamp_behavior;
        if legacy {
            warn!("Legacy timestamp behavior enabled: timestamptz accepts local and unspecified date-times");
        }

        let mut registry = Self::new();
        for kind in builtins::scalar_kinds(legacy) {
            registry.register(kind);
        }

        let mut ranges = Vec::new();
        for (range, subtype) in builtins::range_types(legacy) {
            let subtype = registry.resolve_by_store_type(subtype)?;
            ranges.push((ValueKind::range(range, subtype), default_multirange_name(range)));
        }

        for e in &config.enums {
            registry.register(ValueKind::enumeration(
                e.store_type(),
                e.labels.clone(),
                e.name_translation,
            ));
        }

        for r in &config.ranges {
            let subtype = registry.resolve_by_store_type(&r.subtype)?;
            ranges.push((ValueKind::range(r.store_type(), subtype), r.multirange_store_type()));
        }

        let multiranges = version.supports_multiranges();
        if !multiranges {
            debug!(
                "PostgreSQL {} has no multirange types, skipping {} multiranges",
                version,
                ranges.len()
            );
        }
        for (range, multirange) in ranges {
            if multiranges {
                registry.register(ValueKind::multirange(multirange, range.clone())?);
            }
            registry.register(range);
        }

        registry.fingerprint = Some(config.hash());
        info!(
            "Registered {} value kinds for PostgreSQL {} ({} enums, {} user ranges)",
            registry.len(),
            version,
            config.enums.len(),
            config.ranges.len()
        );
        Ok(registry)
    }

    /// Register a kind.
    ///
    /// The first kind registered for a shape becomes the default for that shape,
    /// and the first kind under a store type is the default for that name.
    pub fn register(&mut self, kind: ValueKind) {
        let key = lookup_key(kind.base_store_type());
        if let KindFamily::Scalar(formatter) = kind.family() {
            self.formatters.insert(key.clone(), formatter.clone());
        }
        self.by_shape
            .entry(kind.clr_shape().clone())
            .or_insert_with(|| key.clone());
        debug!("Registered '{}' for {}", kind.store_type(), kind.clr_shape());
        self.by_store_type.entry(key).or_default().push(kind);
    }

    /// Register a scalar family implemented outside this crate.
    pub fn register_scalar(
        &mut self,
        store_type: &str,
        shape: ClrShape,
        tag: DialectTag,
        formatter: Arc<dyn LiteralFormatter>,
    ) {
        let base = lookup_key(store_type);
        self.register(ValueKind::scalar(base, shape, tag, FormatterImpl::Custom(formatter)));
    }

    /// Resolve the kind for `shape`, optionally constrained to a store type.
    pub fn resolve(&self, shape: &ClrShape, store_type_hint: Option<&str>) -> Result<ValueKind> {
        let kind = match store_type_hint {
            Some(hint) => {
                let name = store_type::parse(hint)?;
                self.lookup_name(Some(shape), &name)
            }
            None => self.lookup_shape(shape),
        };
        match kind {
            Some(kind) => {
                debug!("Resolved {} to '{}'", shape, kind.store_type());
                Ok(kind)
            }
            None => Err(MappingError::not_found(shape, store_type_hint)),
        }
    }

    /// Resolve the default kind for a store type name such as `varchar(20)[]`.
    pub fn resolve_by_store_type(&self, store_type: &str) -> Result<ValueKind> {
        let name = store_type::parse(store_type)?;
        let kind = self
            .lookup_name(None, &name)
            .ok_or_else(|| MappingError::not_found(ClrShape::Unknown, Some(store_type)))?;
        debug!("Resolved store type '{}' to {}", store_type, kind.clr_shape());
        Ok(kind)
    }

    /// Non-failing variant of [`resolve`](Self::resolve).
    #[must_use]
    pub fn find(&self, shape: &ClrShape, store_type_hint: Option<&str>) -> Option<ValueKind> {
        self.resolve(shape, store_type_hint).ok()
    }

    /// Formatter for a scalar store type; facets are ignored.
    #[must_use]
    pub fn formatter(&self, store_type: &str) -> Option<&FormatterImpl> {
        self.formatters.get(&lookup_key(store_type))
    }

    /// Hash of the configuration this registry was built from, if any.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_store_type.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_store_type.is_empty()
    }

    /// Registered store types, sorted.
    pub fn store_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_store_type.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn lookup_shape(&self, shape: &ClrShape) -> Option<ValueKind> {
        match shape {
            ClrShape::Array(element) => self.lookup_shape(element).map(ValueKind::array),
            ClrShape::List(element) => self.lookup_shape(element).map(ValueKind::list),
            _ => {
                let key = self.by_shape.get(shape)?;
                self.candidate(key, Some(shape))
            }
        }
    }

    fn lookup_name(&self, shape: Option<&ClrShape>, name: &StoreTypeName) -> Option<ValueKind> {
        if name.array_rank > 0 {
            let element = self.lookup_name(shape.and_then(ClrShape::element), &name.element())?;
            return match shape {
                Some(ClrShape::List(_)) => Some(ValueKind::list(element)),
                Some(ClrShape::Array(_)) | None => Some(ValueKind::array(element)),
                Some(_) => None,
            };
        }
        let kind = self.candidate(&name.base, shape)?;
        if name.facets.is_empty() {
            Some(kind)
        } else {
            Some(kind.with_facets(name.facets.size, name.facets.precision, name.facets.scale))
        }
    }

    fn candidate(&self, key: &str, shape: Option<&ClrShape>) -> Option<ValueKind> {
        let kinds = self.by_store_type.get(key)?;
        match shape {
            Some(shape) => kinds.iter().find(|k| k.clr_shape().accepts(shape)).cloned(),
            None => kinds.first().cloned(),
        }
    }
}

/// Canonical base name used as the registry key.
fn lookup_key(store_type: &str) -> String {
    match store_type::parse(store_type) {
        Ok(name) if name.array_rank == 0 => name.base,
        _ => store_type.trim().to_lowercase(),
    }
}

impl fmt::Debug for ValueKindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueKindRegistry")
            .field("store_types", &self.store_types())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}
