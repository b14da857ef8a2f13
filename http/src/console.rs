//! Console page classifier
//!
//! The build console renders one column element per builder. A column holds
//! a cell whose class names the result of its latest build. Columns are
//! judged by the first matching class, in order: success, failure,
//! infra failure. Anything else is unknown.

use beacon_core::{
    BuildCounts, BuilderResult, ClassifyError, LayoutConfig, StatusClassifier,
};
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone)]
pub struct ConsoleClassifier {
    layout: LayoutConfig,
}

impl ConsoleClassifier {
    /// Rejects layouts whose selectors do not parse.
    pub fn new(layout: LayoutConfig) -> Result<Self, ClassifyError> {
        Selectors::compile(&layout)?;
        Ok(Self { layout })
    }
}

/// Compiled form of a [`LayoutConfig`].
///
/// Rebuilt on every classify call; the parsed document is not `Send` and
/// neither is kept past the call.
struct Selectors {
    column: Selector,
    success: Selector,
    failure: Selector,
    infra_failure: Selector,
}

impl Selectors {
    fn compile(layout: &LayoutConfig) -> Result<Self, ClassifyError> {
        Ok(Self {
            column: parse_selector(&layout.column)?,
            success: parse_selector(&layout.success)?,
            failure: parse_selector(&layout.failure)?,
            infra_failure: parse_selector(&layout.infra_failure)?,
        })
    }

    fn judge(&self, column: ElementRef<'_>) -> BuilderResult {
        let has = |selector: &Selector| column.select(selector).next().is_some();
        if has(&self.success) {
            BuilderResult::Success
        } else if has(&self.failure) {
            BuilderResult::Failure
        } else if has(&self.infra_failure) {
            BuilderResult::Exception
        } else {
            BuilderResult::Unknown
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ClassifyError> {
    Selector::parse(selector).map_err(|e| ClassifyError::Selector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

impl StatusClassifier for ConsoleClassifier {
    fn classify(&self, body: &str) -> Result<BuildCounts, ClassifyError> {
        if body.trim().is_empty() {
            return Err(ClassifyError::Unparseable);
        }

        let selectors = Selectors::compile(&self.layout)?;
        let document = Html::parse_document(body);

        let mut columns = document.select(&selectors.column).peekable();
        if columns.peek().is_none() {
            return Err(ClassifyError::MissingStructure(self.layout.column.clone()));
        }

        Ok(columns.map(|column| selectors.judge(column)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ConsoleClassifier {
        ConsoleClassifier::new(LayoutConfig::default()).unwrap()
    }

    fn column(inner: &str) -> String {
        format!(r#"<div class="console-builder-column">{inner}</div>"#)
    }

    fn page(columns: &[String]) -> String {
        format!(
            "<html><body><div class=\"console\">{}</div></body></html>",
            columns.concat()
        )
    }

    #[test]
    fn counts_each_column_once() {
        let body = page(&[
            column(r#"<a class="console-Success"></a>"#),
            column(r#"<a class="console-Success"></a>"#),
            column(r#"<a class="console-Failure"></a>"#),
            column(r#"<a class="console-InfraFailure"></a>"#),
            column(r#"<a class="console-Running"></a>"#),
        ]);

        let counts = classifier().classify(&body).unwrap();
        assert_eq!(counts, BuildCounts::new(2, 1, 1, 1));
    }

    #[test]
    fn success_wins_within_a_column() {
        let body = page(&[
            column(r#"<a class="console-Failure"></a><a class="console-Success"></a>"#),
            column(r#"<a class="console-InfraFailure"></a><a class="console-Failure"></a>"#),
        ]);

        let counts = classifier().classify(&body).unwrap();
        assert_eq!(counts, BuildCounts::new(1, 1, 0, 0));
    }

    #[test]
    fn missing_columns() {
        let err = classifier()
            .classify("<html><body><p>maintenance</p></body></html>")
            .unwrap_err();
        assert_eq!(
            err,
            ClassifyError::MissingStructure(".console-builder-column".to_string())
        );
        assert_eq!(err.to_string(), "Could not find .console-builder-column");
    }

    #[test]
    fn empty_body_is_unparseable() {
        let err = classifier().classify("  \n").unwrap_err();
        assert_eq!(err, ClassifyError::Unparseable);
    }

    #[test]
    fn custom_layout() {
        let layout = LayoutConfig {
            column: "li.builder".to_string(),
            success: ".ok".to_string(),
            failure: ".bad".to_string(),
            infra_failure: ".infra".to_string(),
        };
        let classifier = ConsoleClassifier::new(layout).unwrap();
        let body = r#"<ul><li class="builder"><b class="ok"></b></li><li class="builder"><b class="bad"></b></li></ul>"#;

        assert_eq!(classifier.classify(body).unwrap(), BuildCounts::new(1, 1, 0, 0));
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let layout = LayoutConfig {
            column: "div[".to_string(),
            ..LayoutConfig::default()
        };
        let err = ConsoleClassifier::new(layout).unwrap_err();
        assert!(matches!(err, ClassifyError::Selector { .. }));
    }
}
