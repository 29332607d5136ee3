//! Bundle assembly
//!
//! Runs the five synthesizers against one record set and packages every
//! produced document into a single deflated archive. A failing document
//! is recorded and skipped; the rest of the bundle still ships.

use std::io::{Cursor, Write};

use exportdoc_common::{DocumentFailure, DocumentReport};
use thiserror::Error;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{
    BundleInput, Contract, CustomsDeclaration, DocumentArtifact, Invoice, PackingList,
    ShippingAdvice, Synthesizer,
};

/// Archive construction errors. Per-document failures never surface here;
/// they are collected in [`PackagedResult::failures`].
#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("archive write failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Outcome of one bundle run.
#[derive(Debug)]
pub struct PackagedResult {
    pub artifacts: Vec<DocumentArtifact>,
    pub failures: Vec<DocumentFailure>,
    /// Deflated archive holding every produced document.
    pub archive: Vec<u8>,
}

impl PackagedResult {
    #[must_use]
    pub fn report(&self) -> DocumentReport {
        DocumentReport {
            produced: self.artifacts.iter().map(|a| a.name.to_string()).collect(),
            failed: self.failures.clone(),
        }
    }
}

/// Build all five documents and package the survivors.
///
/// # Errors
/// Only archive construction can fail; individual document errors are
/// isolated into the result's failure list.
pub fn build_bundle(input: &BundleInput<'_>) -> Result<PackagedResult, PackagingError> {
    let synthesizers: [&dyn Synthesizer; 5] = [
        &ShippingAdvice,
        &Invoice,
        &PackingList,
        &Contract,
        &CustomsDeclaration,
    ];

    let mut artifacts = Vec::new();
    let mut failures = Vec::new();
    for synthesizer in synthesizers {
        match synthesizer.build(input) {
            Ok(artifact) => {
                info!(name = artifact.name, size = artifact.bytes.len(), "document produced");
                artifacts.push(artifact);
            }
            Err(error) => {
                warn!(name = synthesizer.name(), %error, "document failed");
                failures.push(DocumentFailure {
                    name: synthesizer.name().to_string(),
                    error: error.to_string(),
                });
            }
        }
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for artifact in &artifacts {
        writer.start_file(artifact.name, options)?;
        writer.write_all(&artifact.bytes)?;
    }
    let archive = writer.finish()?.into_inner();

    info!(
        produced = artifacts.len(),
        failed = failures.len(),
        archive_size = archive.len(),
        "bundle packaged"
    );
    Ok(PackagedResult {
        artifacts,
        failures,
        archive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use exportdoc_extractor::RawRow;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    fn sample_rows() -> Vec<RawRow> {
        (1..=3)
            .map(|i| {
                row(&[
                    ("PO", "PO-1"),
                    ("ASIN", "B000TEST"),
                    ("中文品名", "桌布"),
                    ("英文品名", "Widget"),
                    ("海关编码", "6302539090"),
                    ("HS CODE", "6302539090"),
                    ("产品型号", "A-1"),
                    ("托数", "1"),
                    ("箱数", "2"),
                    ("数量", &i.to_string()),
                    ("单价", "10"),
                    ("总价", &(i * 10).to_string()),
                    ("净重", "1.5"),
                    ("毛重", "2.0"),
                    ("长", "30"),
                    ("宽", "20"),
                    ("高", "10"),
                    ("体积", "0.006"),
                    ("发货地", "杭州"),
                    ("合同号码", "HT-2024-001"),
                ])
            })
            .collect()
    }

    fn archive_names(archive: &[u8]) -> Vec<String> {
        let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_full_bundle_has_five_entries() {
        let rows = sample_rows();
        let input = BundleInput {
            rows: &rows,
            contract_no: "HT-2024-001",
            stamp: None,
        };
        let result = build_bundle(&input).unwrap();
        assert!(result.failures.is_empty());
        assert_eq!(
            archive_names(&result.archive),
            vec![
                "报关资料1-ASN.xlsx",
                "报关资料2-发票.xlsx",
                "报关资料3-装箱单.xlsx",
                "报关资料4-合同.xlsx",
                "报关资料5-出口报关单.xlsx",
            ]
        );
        assert!(result.report().is_complete());
    }

    #[test]
    fn test_bad_stamp_fails_only_stamped_documents() {
        let rows = sample_rows();
        let input = BundleInput {
            rows: &rows,
            contract_no: "HT-2024-001",
            stamp: Some(b"not an image"),
        };
        let result = build_bundle(&input).unwrap();
        // Invoice, packing list and contract carry the stamp.
        assert_eq!(result.failures.len(), 3);
        assert_eq!(
            archive_names(&result.archive),
            vec!["报关资料1-ASN.xlsx", "报关资料5-出口报关单.xlsx"]
        );
        let report = result.report();
        assert!(!report.is_complete());
        assert_eq!(report.produced.len(), 2);
    }

    #[test]
    fn test_empty_rows_fail_customs_declaration_only() {
        let rows: Vec<RawRow> = Vec::new();
        let input = BundleInput {
            rows: &rows,
            contract_no: "",
            stamp: None,
        };
        let result = build_bundle(&input).unwrap();
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].name, "报关资料5-出口报关单.xlsx");
        assert_eq!(result.artifacts.len(), 4);
    }

    #[test]
    fn test_documents_parse_as_workbooks() {
        let rows = sample_rows();
        let input = BundleInput {
            rows: &rows,
            contract_no: "HT-2024-001",
            stamp: None,
        };
        let result = build_bundle(&input).unwrap();
        for artifact in &result.artifacts {
            let workbook = calamine::open_workbook_auto_from_rs(Cursor::new(&artifact.bytes));
            assert!(workbook.is_ok(), "{} unreadable", artifact.name);
        }
    }
}
