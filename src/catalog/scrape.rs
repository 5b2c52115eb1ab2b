//! Extract catalog records from a Javadoc `allclasses-frame.html` page.
//!
//! Two page layouts are understood. Generators that emit a `title="kind in
//! package"` attribute are parsed from the title; older generators only
//! carry the package in the `href` path and mark interfaces with `<i>`.

use crate::catalog::types::{ClassKind, ClassRecord, NameRecord, PackageRecord};
use anyhow::{Context, Result};
use regex::Regex;
use rustc_hash::FxHashSet;

const WITH_TITLE: &str =
    r#"(?i)title\s*=\s*"\s*(\S+)\s+in\s+([^\s"]+)[^>]+>(?:\s*<i\s*>)?\s*([^<]+)(?:</i\s*>\s*)?</a\s*>"#;

const WITHOUT_TITLE: &str =
    r#"(?i)<a\s+href\s*=\s*"([^"]+)(?:/|\\)[^"]+"[^>]*>(\s*<i\s*>)?\s*([^<]+)(?:</i\s*>\s*)?</a\s*>"#;

/// Compiled matchers for both class listing layouts
pub struct ClassListParser {
    with_title: Regex,
    without_title: Regex,
}

impl ClassListParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            with_title: Regex::new(WITH_TITLE).context("Failed to compile class title pattern")?,
            without_title: Regex::new(WITHOUT_TITLE)
                .context("Failed to compile class href pattern")?,
        })
    }

    /// Parse class records from the class listing HTML, grouped by kind.
    pub fn class_records(&self, html: &str) -> Vec<ClassRecord> {
        let mut found: Vec<ClassRecord> = self
            .with_title
            .captures_iter(html)
            .filter_map(|caps| {
                let kind = ClassKind::from_title_word(&caps[1])?;
                let class_name = caps[3].trim_end();
                Some(ClassRecord::new(kind.refine(class_name), &caps[2], class_name))
            })
            .collect();

        if found.is_empty() {
            found = self
                .without_title
                .captures_iter(html)
                .map(|caps| {
                    let kind = if caps.get(2).is_some() {
                        ClassKind::Interface
                    } else {
                        ClassKind::Class
                    };
                    let class_name = caps[3].trim_end();
                    let package = caps[1].replace(['/', '\\'], ".");
                    ClassRecord::new(kind.refine(class_name), package, class_name)
                })
                .collect();
        }

        // Stable grouping keeps page order within each kind
        found.sort_by_key(|record| {
            ClassKind::ALL
                .iter()
                .position(|kind| *kind == record.kind())
                .unwrap_or(ClassKind::ALL.len())
        });
        found
    }

    /// Build the full ordered record list for a catalog, packages first.
    pub fn name_records(&self, html: &str, include_packages: bool) -> Vec<NameRecord> {
        let classes = self.class_records(html);
        let mut records = Vec::with_capacity(classes.len() * 2);

        if include_packages {
            records.extend(package_records(&classes).into_iter().map(NameRecord::Package));
        }
        records.extend(classes.into_iter().map(NameRecord::Class));
        records
    }
}

/// Derive the distinct packages of `classes`, ordered component by component.
pub fn package_records(classes: &[ClassRecord]) -> Vec<PackageRecord> {
    let mut seen = FxHashSet::default();
    let mut packages: Vec<PackageRecord> = classes
        .iter()
        .filter(|class| !class.package().is_empty())
        .filter(|class| seen.insert(class.package()))
        .map(|class| PackageRecord::new(class.package()))
        .collect();

    packages.sort_by(|a, b| a.name().split('.').cmp(b.name().split('.')));
    packages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_layout() {
        let html = r#"<a href="java/lang/Object.html" title="class in java.lang" target="classFrame">Object</a>
<a href="java/util/List.html" title="interface in java.util" target="classFrame"><i>List</i></a>"#;

        let records = ClassListParser::new().unwrap().class_records(html);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind(), ClassKind::Interface);
        assert_eq!(records[0].canonical_name(), "java.util.List");
        assert_eq!(records[1].kind(), ClassKind::Class);
        assert_eq!(records[1].canonical_name(), "java.lang.Object");
    }

    #[test]
    fn test_uppercase_tags_and_whitespace() {
        let html = r#"<A   HREF  =  "java/awt/Button.html"   TITLE="class IN java.awt"  TARGET="classFrame"  >  Button   </A  >"#;

        let records = ClassListParser::new().unwrap().class_records(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].package(), "java.awt");
        assert_eq!(records[0].class_name(), "Button");
    }

    #[test]
    fn test_href_layout() {
        let html = r#"<a href="java/io/Closeable.html" target="classFrame"><i>Closeable</i></a>
<a href="java/io/IOException.html" target="classFrame">IOException</a>
<a href="java\lang\Object.html" target="classFrame">Object</a>"#;

        let records = ClassListParser::new().unwrap().class_records(html);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].kind(), ClassKind::Interface);
        assert_eq!(records[0].package(), "java.io");
        assert_eq!(records[1].kind(), ClassKind::Class);
        assert_eq!(records[1].canonical_name(), "java.lang.Object");
        assert_eq!(records[2].kind(), ClassKind::Exception);
    }

    #[test]
    fn test_grouped_by_kind() {
        let html = r#"<a href="a/Thing.html" title="annotation in a" target="classFrame">Thing</a>
<a href="a/Oops.html" title="class in a" target="classFrame">OopsError</a>
<a href="a/Color.html" title="enum in a" target="classFrame">Color</a>
<a href="a/Widget.html" title="class in a" target="classFrame">Widget</a>"#;

        let records = ClassListParser::new().unwrap().class_records(html);
        let kinds: Vec<ClassKind> = records.iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![ClassKind::Class, ClassKind::Enum, ClassKind::Error, ClassKind::Annotation]
        );
    }

    #[test]
    fn test_package_records_sorted() {
        let classes = vec![
            ClassRecord::new(ClassKind::Class, "javax.swing.border", "AbstractBorder"),
            ClassRecord::new(ClassKind::Class, "java.awt", "Button"),
            ClassRecord::new(ClassKind::Class, "javax.swing", "SwingWorker"),
            ClassRecord::new(ClassKind::Class, "java.awt", "Canvas"),
        ];

        let names: Vec<String> = package_records(&classes)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["java.awt", "javax.swing", "javax.swing.border"]);
    }

    #[test]
    fn test_name_records_packages_first() {
        let html = r#"<a href="java/lang/Object.html" title="class in java.lang" target="classFrame">Object</a>"#;

        let parser = ClassListParser::new().unwrap();
        let records = parser.name_records(html, true);
        assert_eq!(records.len(), 2);
        assert!(records[0].is_package());

        let records = parser.name_records(html, false);
        assert_eq!(records.len(), 1);
    }
}
