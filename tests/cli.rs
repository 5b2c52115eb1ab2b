//! Integration tests running the jdsearch binary against fixture Javadoc.
//!
//! Every test gets its own documentation directory and its own app data
//! directory (via `XDG_DATA_HOME`/`HOME`), so imported catalogs never leak
//! between tests or into the user's real data directory.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const ALLCLASSES: &str = r#"<HTML><BODY>
<FONT CLASS="FrameHeadingFont"><B>All Classes</B></FONT>
<A HREF="java/io/Closeable.html" title="interface in java.io" target="classFrame"><I>Closeable</I></A><BR>
<A HREF="java/lang/Object.html" title="class in java.lang" target="classFrame">Object</A><BR>
<A HREF="org/omg/CORBA/Object.html" title="interface in org.omg.CORBA" target="classFrame"><I>Object</I></A><BR>
<A HREF="java/io/IOException.html" title="class in java.io" target="classFrame">IOException</A><BR>
</BODY></HTML>"#;

const OBJECT_PAGE: &str = r#"<HTML><BODY>
<A NAME="navbar_top"><!-- --></A>
<A NAME="method_summary"><!-- --></A>
<A NAME="wait(long)"><!-- --></A>
<A NAME="toString()"><!-- --></A>
<A NAME="methods_inherited_from_class_java.lang.Object"><!-- --></A>
</BODY></HTML>"#;

struct Fixture {
    docs: TempDir,
    data: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let docs = tempfile::tempdir().unwrap();
        fs::write(docs.path().join("allclasses-frame.html"), ALLCLASSES).unwrap();
        fs::create_dir_all(docs.path().join("java/lang")).unwrap();
        fs::write(docs.path().join("java/lang/Object.html"), OBJECT_PAGE).unwrap();

        Self {
            docs,
            data: tempfile::tempdir().unwrap(),
        }
    }

    fn docs(&self) -> &Path {
        self.docs.path()
    }

    /// Run jdsearch, returning (stdout, stderr, success)
    fn run(&self, args: &[&str]) -> (String, String, bool) {
        let output = Command::new(env!("CARGO_BIN_EXE_jdsearch"))
            .args(args)
            .env("XDG_DATA_HOME", self.data.path())
            .env("HOME", self.data.path())
            .env("RUST_LOG", "warn")
            .output()
            .expect("Failed to run jdsearch");

        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.success(),
        )
    }

    fn query(&self, query: &str) -> (String, String, bool) {
        let docs = self.docs().to_str().unwrap().to_string();
        self.run(&["query", query, "--docs", &docs])
    }
}

#[test]
fn test_query_acronym() {
    let fixture = Fixture::new();
    let (stdout, stderr, ok) = fixture.query("JLO");

    assert!(ok, "jdsearch failed: {}", stderr);
    assert!(stdout.contains("Classes"));
    assert!(stdout.contains("Object (java.lang)"));
    assert!(!stdout.contains("org.omg.CORBA"));
    assert!(stdout.contains("=> file://"));
    assert!(stdout.trim_end().ends_with("java/lang/Object.html"));
}

#[test]
fn test_query_best_match() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.query("java.io");

    assert!(ok);
    assert!(stdout.starts_with("Best Match"));
    assert!(stdout.contains("Packages"));
    assert!(stdout.contains("Interfaces"));
    assert!(stdout.contains("Exceptions"));
    assert!(stdout.trim_end().ends_with("java/io/package-summary.html"));
}

#[test]
fn test_query_all_exact_has_no_best_match() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.query("Object");

    assert!(ok);
    assert!(!stdout.contains("Best Match"));
    // First entry in catalog order wins
    assert!(stdout.trim_end().ends_with("org/omg/CORBA/Object.html"));
}

#[test]
fn test_query_no_results() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.query("zzz");

    assert!(ok);
    assert_eq!(stdout.trim(), "No search results.");
}

#[test]
fn test_query_members() {
    let fixture = Fixture::new();
    let (stdout, stderr, ok) = fixture.query("java.lang.Object#wa");

    assert!(ok, "jdsearch failed: {}", stderr);
    assert!(stdout.contains("Class java.lang.Object"));
    assert!(stdout.contains("wait(long)"));
    assert!(!stdout.contains("toString()"));
    assert!(stdout.trim_end().ends_with("java/lang/Object.html#wait(long)"));
}

#[test]
fn test_query_keywords_follow_members() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.query("java.lang.Object#");

    assert!(ok);
    let members = stdout.find("Members").expect("members section");
    let keywords = stdout.find("Keywords").expect("keywords section");
    assert!(members < keywords);
    assert!(stdout.contains("method summary"));
}

#[test]
fn test_query_menu_opens_item() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.query("java.lang.Object@2");

    assert!(ok);
    assert!(stdout.contains("Opened http://www.docjar.com/s.jsp?q=Object"));
}

#[test]
fn test_import_list_remove() {
    let fixture = Fixture::new();
    let docs = fixture.docs().to_str().unwrap().to_string();

    let (stdout, stderr, ok) = fixture.run(&["import", &docs, "--base-url", "http://example.com/api"]);
    assert!(ok, "import failed: {}", stderr);
    assert!(stdout.contains("Imported 7 names"));

    let (stdout, _, ok) = fixture.run(&["list"]);
    assert!(ok);
    assert!(stdout.contains(&docs));
    assert!(stdout.contains("http://example.com/api/"));

    let (stdout, _, ok) = fixture.run(&["remove", &docs]);
    assert!(ok);
    assert!(stdout.contains("Removed catalog"));

    let (stdout, _, _) = fixture.run(&["list"]);
    assert!(stdout.contains("No catalogs imported"));
}

#[test]
fn test_missing_listing_fails() {
    let fixture = Fixture::new();
    let empty = tempfile::tempdir().unwrap();
    let (_, stderr, ok) = fixture.run(&["query", "Object", "--docs", empty.path().to_str().unwrap()]);

    assert!(!ok);
    assert!(stderr.contains("allclasses-frame.html"));
}
