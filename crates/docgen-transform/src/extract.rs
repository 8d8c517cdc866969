//! Adapter around the external documentation extractor.

use std::panic::{self, AssertUnwindSafe};

use crate::config::ResolverStrategy;
use crate::error::ExtractError;
use crate::record::DocRecord;

/// Turns component source text into documentation records.
///
/// Implementations report failures as [`ExtractError`]. The pass treats
/// every failure as "nothing to document".
pub trait DocExtractor {
    fn extract(
        &self,
        source: &str,
        resolver: ResolverStrategy,
    ) -> Result<Vec<DocRecord>, ExtractError>;
}

impl<F> DocExtractor for F
where
    F: Fn(&str, ResolverStrategy) -> Result<Vec<DocRecord>, ExtractError>,
{
    fn extract(
        &self,
        source: &str,
        resolver: ResolverStrategy,
    ) -> Result<Vec<DocRecord>, ExtractError> {
        self(source, resolver)
    }
}

/// Normalises extractor results for one module.
pub struct DocExtraction<'e, E: ?Sized> {
    extractor: &'e E,
    resolver: ResolverStrategy,
    include_methods: bool,
}

impl<'e, E: DocExtractor + ?Sized> DocExtraction<'e, E> {
    pub fn new(extractor: &'e E, resolver: ResolverStrategy, include_methods: bool) -> Self {
        Self {
            extractor,
            resolver,
            include_methods,
        }
    }

    /// Extracts records from `source`.
    ///
    /// Errors and panics inside the extractor yield an empty list.
    pub fn extract(&self, source: &str) -> Vec<DocRecord> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.extractor.extract(source, self.resolver)
        }));

        let mut records = match result {
            Ok(Ok(records)) => records,
            Ok(Err(err)) => {
                tracing::debug!("skipping docgen: {}", err);
                return Vec::new();
            }
            Err(_) => {
                tracing::warn!("documentation extractor panicked; skipping module");
                return Vec::new();
            }
        };

        if !self.include_methods {
            for record in &mut records {
                record.strip_methods();
            }
        }
        records
    }
}
