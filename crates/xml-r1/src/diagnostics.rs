//! Severity-tagged result details accumulated during encode and decode.
//!
//! The sink never fails and never interrupts a call. A formatting call that
//! returns `Ok` may still have recorded warnings or recovered errors; callers
//! inspect the sink after the call to learn about degraded results.

/// How serious a recorded detail is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Information,
    Warning,
    Error,
}

/// What kind of condition a detail describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    General,
    /// An object-model field with no wire representation in this revision.
    UnsupportedProperty,
    /// The recomputed content digest differs from the stored one.
    IntegrityMismatch,
    /// A nested child failed to parse; its siblings were still processed.
    RecoveredChild,
    /// A structural rule violation found by post-decode validation.
    Validation,
}

/// One non-aborting condition found during encode or decode.
#[derive(Debug, Clone)]
pub struct ResultDetail {
    pub severity: Severity,
    pub kind: DetailKind,
    pub message: String,
    /// Slash-joined element path where the condition was found.
    pub location: String,
}

impl ResultDetail {
    pub fn new(
        severity: Severity,
        kind: DetailKind,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        ResultDetail {
            severity,
            kind,
            message: message.into(),
            location: location.into(),
        }
    }

    /// Warning for a field the R1 wire cannot represent.
    pub fn unsupported_property(property: &str, type_name: &str, location: &str) -> Self {
        ResultDetail::new(
            Severity::Warning,
            DetailKind::UnsupportedProperty,
            format!("{type_name} property '{property}' is not supported by the R1 wire format and was not written"),
            location,
        )
    }
}

/// Append-only collection of [`ResultDetail`]s owned by one formatting call.
#[derive(Debug, Default)]
pub struct Diagnostics {
    details: Vec<ResultDetail>,
}

impl Diagnostics {
    pub fn add(&mut self, detail: ResultDetail) {
        self.details.push(detail);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultDetail> {
        self.details.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn has_errors(&self) -> bool {
        self.details
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn count_of(&self, kind: DetailKind) -> usize {
        self.details.iter().filter(|d| d.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_accumulates() {
        let mut dx = Diagnostics::default();
        assert!(dx.is_empty());
        dx.add(ResultDetail::unsupported_property("description", "ED", "/text"));
        dx.add(ResultDetail::new(
            Severity::Error,
            DetailKind::RecoveredChild,
            "bad child",
            "/text/thumbnail",
        ));
        assert_eq!(dx.len(), 2);
        assert!(dx.has_errors());
        assert_eq!(dx.count_of(DetailKind::UnsupportedProperty), 1);
        assert_eq!(dx.count_of(DetailKind::IntegrityMismatch), 0);
    }
}
