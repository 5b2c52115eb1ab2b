use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag of a class-like catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Interface,
    Class,
    Enum,
    Exception,
    Error,
    Annotation,
}

impl ClassKind {
    /// Catalog ordering of class kinds
    pub const ALL: [ClassKind; 6] = [
        ClassKind::Interface,
        ClassKind::Class,
        ClassKind::Enum,
        ClassKind::Exception,
        ClassKind::Error,
        ClassKind::Annotation,
    ];

    /// Parse the leading word of a Javadoc link title ("class in java.lang")
    pub fn from_title_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "class" => Some(ClassKind::Class),
            "interface" => Some(ClassKind::Interface),
            "enum" => Some(ClassKind::Enum),
            "annotation" => Some(ClassKind::Annotation),
            "exception" => Some(ClassKind::Exception),
            "error" => Some(ClassKind::Error),
            _ => None,
        }
    }

    /// Javadoc lists exceptions and errors as plain classes; tell them apart by name.
    pub fn refine(self, class_name: &str) -> Self {
        match self {
            ClassKind::Class if class_name.ends_with("Exception") => ClassKind::Exception,
            ClassKind::Class if class_name.ends_with("Error") => ClassKind::Error,
            other => other,
        }
    }
}

/// Grouping tag used when rendering result lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Package,
    Class(ClassKind),
    Member,
    Keyword,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Package => "Package",
            RecordKind::Class(ClassKind::Interface) => "Interface",
            RecordKind::Class(ClassKind::Class) => "Class",
            RecordKind::Class(ClassKind::Enum) => "Enum",
            RecordKind::Class(ClassKind::Exception) => "Exception",
            RecordKind::Class(ClassKind::Error) => "Error",
            RecordKind::Class(ClassKind::Annotation) => "Annotation Type",
            RecordKind::Member => "Member",
            RecordKind::Keyword => "Keyword",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            RecordKind::Package => "Packages",
            RecordKind::Class(ClassKind::Interface) => "Interfaces",
            RecordKind::Class(ClassKind::Class) => "Classes",
            RecordKind::Class(ClassKind::Enum) => "Enums",
            RecordKind::Class(ClassKind::Exception) => "Exceptions",
            RecordKind::Class(ClassKind::Error) => "Errors",
            RecordKind::Class(ClassKind::Annotation) => "Annotation Types",
            RecordKind::Member => "Members",
            RecordKind::Keyword => "Keywords",
        }
    }
}

/// Anything a compiled search pattern can be tested against.
///
/// A record matches when any of its searchable fields matches.
pub trait Matchable {
    fn matches(&self, regex: &Regex) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    name: String,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package name as a URL path (`java.lang` -> `java/lang`)
    pub fn path(&self) -> String {
        self.name.replace('.', "/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    kind: ClassKind,
    package: String,
    class_name: String,
    canonical_name: String,
    /// Trailing segments of a nested class name, outermost dropped first
    inner_names: Vec<String>,
}

impl ClassRecord {
    pub fn new(kind: ClassKind, package: impl Into<String>, class_name: impl Into<String>) -> Self {
        let package = package.into();
        let class_name = class_name.into();

        let canonical_name = if package.is_empty() {
            class_name.clone()
        } else {
            format!("{}.{}", package, class_name)
        };

        let segments: Vec<&str> = class_name.split('.').collect();
        let inner_names = (1..segments.len())
            .map(|start| segments[start..].join("."))
            .collect();

        Self {
            kind,
            package,
            class_name,
            canonical_name,
            inner_names,
        }
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn inner_names(&self) -> &[String] {
        &self.inner_names
    }
}

/// One package or class of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRecord {
    Package(PackageRecord),
    Class(ClassRecord),
}

impl NameRecord {
    pub fn package(name: impl Into<String>) -> Self {
        NameRecord::Package(PackageRecord::new(name))
    }

    pub fn class(kind: ClassKind, package: impl Into<String>, class_name: impl Into<String>) -> Self {
        NameRecord::Class(ClassRecord::new(kind, package, class_name))
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            NameRecord::Package(_) => RecordKind::Package,
            NameRecord::Class(class) => RecordKind::Class(class.kind),
        }
    }

    pub fn is_package(&self) -> bool {
        matches!(self, NameRecord::Package(_))
    }

    pub fn package_name(&self) -> &str {
        match self {
            NameRecord::Package(package) => &package.name,
            NameRecord::Class(class) => &class.package,
        }
    }

    /// Simple class name, empty for packages
    pub fn class_name(&self) -> &str {
        match self {
            NameRecord::Package(_) => "",
            NameRecord::Class(class) => &class.class_name,
        }
    }

    /// Package name for packages, canonical name for classes
    pub fn qualified_name(&self) -> &str {
        match self {
            NameRecord::Package(package) => &package.name,
            NameRecord::Class(class) => &class.canonical_name,
        }
    }

    /// Name shown in result lists
    pub fn display_name(&self) -> &str {
        match self {
            NameRecord::Package(package) => &package.name,
            NameRecord::Class(class) => &class.class_name,
        }
    }

    /// Number of dot-separated components of the qualified name
    pub fn depth(&self) -> usize {
        self.qualified_name().split('.').count()
    }

    /// Documentation page relative to the Javadoc root
    pub fn relative_url(&self) -> String {
        let package_path = self.package_name().replace('.', "/");
        let file = match self {
            NameRecord::Package(_) => "package-summary",
            NameRecord::Class(class) => &class.class_name,
        };

        if package_path.is_empty() {
            format!("{}.html", file)
        } else {
            format!("{}/{}.html", package_path, file)
        }
    }
}

impl Matchable for NameRecord {
    fn matches(&self, regex: &Regex) -> bool {
        match self {
            NameRecord::Package(package) => regex.is_match(&package.name),
            NameRecord::Class(class) => {
                regex.is_match(&class.class_name)
                    || regex.is_match(&class.canonical_name)
                    || class.inner_names.iter().any(|name| regex.is_match(name))
            }
        }
    }
}

impl fmt::Display for NameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

/// An anchor declared in a documentation page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub name: String,
    pub display: String,
}

/// A member or structural keyword anchor of one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRecord {
    Member(Anchor),
    Keyword(Anchor),
}

impl MemberRecord {
    pub fn anchor(&self) -> &Anchor {
        match self {
            MemberRecord::Member(anchor) | MemberRecord::Keyword(anchor) => anchor,
        }
    }

    pub fn anchor_name(&self) -> &str {
        &self.anchor().name
    }

    pub fn display_name(&self) -> &str {
        &self.anchor().display
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, MemberRecord::Keyword(_))
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            MemberRecord::Member(_) => RecordKind::Member,
            MemberRecord::Keyword(_) => RecordKind::Keyword,
        }
    }

    /// Member name without its parameter list; keywords have none.
    pub fn member_name(&self) -> &str {
        match self {
            MemberRecord::Member(anchor) => match anchor.display.find('(') {
                Some(paren) => &anchor.display[..paren],
                None => &anchor.display,
            },
            MemberRecord::Keyword(_) => "",
        }
    }

    pub fn url(&self, page_url: &str) -> String {
        format!("{}#{}", page_url, self.anchor_name())
    }
}

impl Matchable for MemberRecord {
    fn matches(&self, regex: &Regex) -> bool {
        let anchor = self.anchor();
        regex.is_match(&anchor.name) || regex.is_match(&anchor.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_names() {
        let record = ClassRecord::new(ClassKind::Class, "test", "Outer.Apple.Banana");
        assert_eq!(record.canonical_name(), "test.Outer.Apple.Banana");
        assert_eq!(record.inner_names(), ["Apple.Banana", "Banana"]);

        let flat = ClassRecord::new(ClassKind::Class, "java.lang", "Object");
        assert!(flat.inner_names().is_empty());
    }

    #[test]
    fn test_depth() {
        assert_eq!(NameRecord::package("hudson").depth(), 1);
        assert_eq!(NameRecord::package("java.lang").depth(), 2);
        assert_eq!(NameRecord::class(ClassKind::Class, "java.lang", "Object").depth(), 3);
        assert_eq!(NameRecord::class(ClassKind::Class, "org.omg.CORBA", "Object").depth(), 4);
    }

    #[test]
    fn test_relative_url() {
        assert_eq!(
            NameRecord::package("java.io").relative_url(),
            "java/io/package-summary.html"
        );
        assert_eq!(
            NameRecord::class(ClassKind::Class, "java.awt.geom", "Point2D.Double").relative_url(),
            "java/awt/geom/Point2D.Double.html"
        );
        assert_eq!(NameRecord::class(ClassKind::Class, "", "Main").relative_url(), "Main.html");
    }

    #[test]
    fn test_refine_kind() {
        assert_eq!(ClassKind::Class.refine("IOException"), ClassKind::Exception);
        assert_eq!(ClassKind::Class.refine("AssertionError"), ClassKind::Error);
        assert_eq!(ClassKind::Class.refine("Object"), ClassKind::Class);
        assert_eq!(ClassKind::Interface.refine("ErrorHandler"), ClassKind::Interface);
    }

    #[test]
    fn test_matches_inner_suffix() {
        let record = NameRecord::class(ClassKind::Class, "test", "Outer.Apple.Banana");
        let banana = Regex::new("^Banana$").unwrap();
        let apple = Regex::new("^Apple\\.Banana$").unwrap();
        let package = Regex::new("^test$").unwrap();

        assert!(record.matches(&banana));
        assert!(record.matches(&apple));
        assert!(!record.matches(&package));
    }

    #[test]
    fn test_member_name() {
        let member = MemberRecord::Member(Anchor {
            name: "wait-long-".to_string(),
            display: "wait(long)".to_string(),
        });
        assert_eq!(member.member_name(), "wait");
        assert_eq!(member.url("java/lang/Object.html"), "java/lang/Object.html#wait-long-");

        let keyword = MemberRecord::Keyword(Anchor {
            name: "method_summary".to_string(),
            display: "method summary".to_string(),
        });
        assert_eq!(keyword.member_name(), "");
        assert!(keyword.is_keyword());
    }
}
