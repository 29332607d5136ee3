//! Export document synthesis
//!
//! Five synthesizers share one skeleton: project or aggregate the extracted
//! rows, lay the document out on a grid canvas, serialize to workbook
//! bytes. [`bundle::build_bundle`] runs all five against one record set and
//! packages the survivors into a single archive, isolating per-document
//! failures.

pub mod aggregate;
mod blocks;
pub mod bundle;
mod contract;
mod customs_declaration;
mod format;
mod invoice;
mod packing_list;
mod shipping_advice;

pub use bundle::{build_bundle, PackagedResult, PackagingError};
pub use contract::Contract;
pub use customs_declaration::CustomsDeclaration;
pub use invoice::Invoice;
pub use packing_list::PackingList;
pub use shipping_advice::ShippingAdvice;

use exportdoc_extractor::RawRow;
use exportdoc_sheet::SheetError;
use thiserror::Error;

/// Shared input for every synthesizer in a bundle run.
#[derive(Debug, Clone, Copy)]
pub struct BundleInput<'a> {
    pub rows: &'a [RawRow],
    /// Contract number from the first row, empty when absent.
    pub contract_no: &'a str,
    /// Company stamp image, placed on the documents that carry one.
    pub stamp: Option<&'a [u8]>,
}

/// One finished document, named for its archive entry.
#[derive(Debug, Clone)]
pub struct DocumentArtifact {
    pub name: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    /// The record set carries none of the references this document needs.
    #[error("no usable records for document")]
    MissingReference,

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// A builder for one of the five documents.
pub trait Synthesizer {
    /// Archive entry name of the produced document.
    fn name(&self) -> &'static str;

    /// Build the document from the shared bundle input.
    ///
    /// # Errors
    /// Failures are per-document; the bundle isolates them and keeps
    /// building the rest.
    fn build(&self, input: &BundleInput<'_>) -> Result<DocumentArtifact, DocumentError>;
}
