//! The process-wide document and its lifecycle.
//!
//! A [`PipelineContext`] is built once by whoever orchestrates the run. The
//! first access assembles the document from the raw source; every later
//! access, including any number of example merges, works on that same
//! instance. [`PipelineContext::finalize`] consumes the context, so the
//! document is stamped and handed to the writer exactly once.

use crate::assembler::assemble;
use crate::config::AssemblySettings;
use crate::document::Document;
use crate::error::Result;
use crate::examples::ExampleBatch;
use crate::merger::{merge_examples, MergeReport};
use crate::serializer::finalize;
use crate::source::RawSchemaSource;
use log::debug;
use once_cell::unsync::OnceCell;

pub struct PipelineContext {
    source: Box<dyn RawSchemaSource>,
    settings: AssemblySettings,
    document: OnceCell<Document>,
}

impl PipelineContext {
    pub fn new(source: Box<dyn RawSchemaSource>, settings: AssemblySettings) -> Self {
        Self {
            source,
            settings,
            document: OnceCell::new(),
        }
    }

    pub fn is_assembled(&self) -> bool {
        self.document.get().is_some()
    }

    /// The assembled document, assembling it on first use.
    pub fn document(&self) -> Result<&Document> {
        self.document
            .get_or_try_init(|| assemble(self.source.as_ref(), &self.settings))
    }

    /// Merges one batch of captured examples into the shared document.
    pub fn merge(&mut self, batch: &ExampleBatch) -> Result<MergeReport> {
        self.document()?;
        match self.document.get_mut() {
            Some(document) => merge_examples(document, batch),
            None => Ok(MergeReport::default()),
        }
    }

    /// Stamps `release` into the document and gives it up for writing.
    pub fn finalize(self, release: &str) -> Result<Document> {
        self.document()?;
        debug!("Finalizing document for release {}", release);
        let document = self.document.into_inner().unwrap_or_default();
        finalize(document, release)
    }
}
