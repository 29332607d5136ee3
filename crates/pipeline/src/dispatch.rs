//! Task dispatch table
//!
//! One match owns both facts about a task kind: the handler that runs it
//! and the extension its output carries by default.

use exportdoc_common::TaskKind;

/// How the worker processes a task's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Input bytes are persisted unchanged.
    Passthrough,
    /// Spreadsheet in, archive of customs documents out.
    CustomsBundle,
}

/// Dispatch entry for one task kind.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    pub default_ext: &'static str,
    pub handler: Handler,
}

/// The single source of truth mapping task kinds to their behavior.
#[must_use]
pub fn task_spec(kind: TaskKind) -> TaskSpec {
    match kind {
        TaskKind::Image => TaskSpec {
            default_ext: "png",
            handler: Handler::Passthrough,
        },
        TaskKind::Excel => TaskSpec {
            default_ext: "xlsx",
            handler: Handler::Passthrough,
        },
        TaskKind::ExcelToPdf => TaskSpec {
            default_ext: "pdf",
            handler: Handler::Passthrough,
        },
        TaskKind::Text => TaskSpec {
            default_ext: "txt",
            handler: Handler::Passthrough,
        },
        TaskKind::Baoguan => TaskSpec {
            default_ext: "zip",
            handler: Handler::CustomsBundle,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extensions() {
        assert_eq!(task_spec(TaskKind::Image).default_ext, "png");
        assert_eq!(task_spec(TaskKind::Excel).default_ext, "xlsx");
        assert_eq!(task_spec(TaskKind::ExcelToPdf).default_ext, "pdf");
        assert_eq!(task_spec(TaskKind::Text).default_ext, "txt");
        assert_eq!(task_spec(TaskKind::Baoguan).default_ext, "zip");
    }

    #[test]
    fn test_only_baoguan_bundles() {
        for kind in [
            TaskKind::Image,
            TaskKind::Excel,
            TaskKind::ExcelToPdf,
            TaskKind::Text,
        ] {
            assert_eq!(task_spec(kind).handler, Handler::Passthrough);
        }
        assert_eq!(task_spec(TaskKind::Baoguan).handler, Handler::CustomsBundle);
    }
}
