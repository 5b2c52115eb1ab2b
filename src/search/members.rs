//! Member and keyword stage: fetch the selected page and search its anchors.

use crate::catalog::{Anchor, MemberRecord};
use crate::loader::{ProgressCallback, ResourceLoader, Transport};
use crate::query::pattern::compile_fuzzy;
use crate::search::{Content, SearchContext, TopMember};
use anyhow::{Context, Result};
use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Structural anchors emitted by the Javadoc generators, in `_` spelling
const KEYWORDS: [&str; 13] = [
    "navbar_top",
    "navbar_top_firstrow",
    "skip_navbar_top",
    "field_summary",
    "nested_class_summary",
    "constructor_summary",
    "constructor_detail",
    "method_summary",
    "method_detail",
    "field_detail",
    "navbar_bottom",
    "navbar_bottom_firstrow",
    "skip_navbar_bottom",
];

const KEYWORD_PREFIXES: [&str; 3] = [
    "methods_inherited_from_",
    "fields_inherited_from_",
    "nested_classes_inherited_from_",
];

/// Default number of parsed pages kept around
const DEFAULT_CACHE_SIZE: usize = 64;

/// Turn one anchor name into a member or keyword record.
pub fn classify(anchor: &str) -> MemberRecord {
    let key = anchor.replace(['-', '.'], "_");

    if KEYWORDS.contains(&key.as_str()) || KEYWORD_PREFIXES.iter().any(|p| key.starts_with(p)) {
        MemberRecord::Keyword(Anchor {
            name: anchor.to_string(),
            display: anchor.replace(['_', '-', '.'], " "),
        })
    } else {
        MemberRecord::Member(Anchor {
            name: anchor.to_string(),
            display: member_display(anchor),
        })
    }
}

/// `wait-long-int-` -> `wait(long, int)`; `wait(long)` is kept as it is.
fn member_display(anchor: &str) -> String {
    if anchor.contains('(') || anchor.matches('-').count() < 2 {
        return anchor.to_string();
    }

    let Some((name, params)) = anchor.split_once('-') else {
        return anchor.to_string();
    };
    let params = params.strip_suffix('-').unwrap_or(params);
    let params: Vec<String> = params
        .split('-')
        .filter(|p| !p.is_empty())
        .map(|p| p.replace(":A", "[]"))
        .collect();

    format!("{}({})", name, params.join(", "))
}

/// Extracts `<a name="...">` and `<a id="...">` declarations from a page
pub struct AnchorParser {
    anchor: Regex,
}

impl AnchorParser {
    pub fn new() -> Result<Self> {
        let anchor = Regex::new(r#"(?i)<a\s+(?:name|id)\s*=\s*"([^"]+)""#)
            .context("Failed to compile anchor pattern")?;
        Ok(Self { anchor })
    }

    /// Members in page order, followed by keywords in page order
    pub fn parse(&self, page: &str) -> Vec<MemberRecord> {
        let (mut members, keywords): (Vec<_>, Vec<_>) = self
            .anchor
            .captures_iter(page)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .map(classify)
            .partition(|record| !record.is_keyword());

        members.extend(keywords);
        members
    }
}

pub struct MemberStage {
    loader: ResourceLoader,
    parser: AnchorParser,
    /// Parsed anchors per page URL
    cache: LruCache<String, Arc<[MemberRecord]>>,
}

impl MemberStage {
    pub fn new(transport: impl Transport + 'static, cache_size: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(cache_size)
            .or(NonZeroUsize::new(DEFAULT_CACHE_SIZE))
            .context("Member cache needs a non-zero size")?;

        Ok(Self {
            loader: ResourceLoader::new(transport),
            parser: AnchorParser::new()?,
            cache: LruCache::new(capacity),
        })
    }

    pub fn loader(&self) -> &ResourceLoader {
        &self.loader
    }

    /// Apply pending page transfer events
    pub fn poll(&mut self) -> bool {
        self.loader.poll()
    }

    pub fn perform(
        &mut self,
        ctx: &mut SearchContext,
        query: Option<&str>,
        on_progress: impl FnMut() + 'static,
    ) {
        let (Some(query), Some(owner), Some(page_url)) =
            (query, ctx.top_name.clone(), ctx.top_name_url.clone())
        else {
            self.loader.abort();
            return;
        };

        let members = match self.cache.get(&page_url).cloned() {
            Some(members) => {
                if self.loader.url().is_some_and(|url| url != page_url) {
                    self.loader.abort();
                }
                members
            }
            None => {
                let callback: ProgressCallback = Box::new(on_progress);
                self.loader.load(&page_url, callback);

                let Some(page) = self.loader.resource() else {
                    let status = self.loader.status_message();
                    ctx.members_loading = !self.loader.is_errored();
                    ctx.set_render(move || Content::Loading {
                        owner,
                        page_url,
                        status,
                    });
                    return;
                };

                let parsed: Arc<[MemberRecord]> = self.parser.parse(page).into();
                self.cache.put(page_url.clone(), Arc::clone(&parsed));
                parsed
            }
        };

        let predicate = compile_fuzzy(query);
        let matching: Vec<MemberRecord> = members
            .iter()
            .filter(|member| predicate.matches(*member))
            .cloned()
            .collect();

        ctx.top_member = match matching.first() {
            Some(member) => TopMember::Found(member.clone()),
            None => TopMember::NoMatch,
        };
        ctx.set_render(move || Content::Members {
            owner,
            page_url,
            members: matching,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_display() {
        assert_eq!(member_display("wait-long-"), "wait(long)");
        assert_eq!(member_display("wait-long-int-"), "wait(long, int)");
        assert_eq!(member_display("hashCode--"), "hashCode()");
        assert_eq!(member_display("equals-java.lang.Object-"), "equals(java.lang.Object)");
        assert_eq!(member_display("sort-int:A-"), "sort(int[])");
        assert_eq!(member_display("wait(long, int)"), "wait(long, int)");
        assert_eq!(member_display("MAX_VALUE"), "MAX_VALUE");
        assert_eq!(member_display("non-dashed"), "non-dashed");
    }

    #[test]
    fn test_classify_keywords() {
        for anchor in [
            "method_summary",
            "method.summary",
            "skip-navbar_top",
            "skip.navbar.top",
            "methods_inherited_from_class_java.lang.Object",
            "methods.inherited.from.class.java.lang.Object",
            "fields_inherited_from_interface_java.io.Serializable",
            "nested.classes.inherited.from.class.java.util.Map",
        ] {
            assert!(classify(anchor).is_keyword(), "{anchor} should be a keyword");
        }

        let keyword = classify("constructor.summary");
        assert_eq!(keyword.display_name(), "constructor summary");

        assert!(!classify("toString--").is_keyword());
        assert!(!classify("MAX_VALUE").is_keyword());
    }

    #[test]
    fn test_uppercase_constants_are_members() {
        for anchor in ["METHOD_SUMMARY", "FIELD_DETAIL", "NAVBAR_TOP", "Methods_inherited_from_x"] {
            let record = classify(anchor);
            assert!(!record.is_keyword(), "{anchor} should be a member");
            assert_eq!(record.display_name(), anchor);
        }
    }

    #[test]
    fn test_parse_orders_keywords_last() {
        let page = r#"
<a name="navbar.top"></a>
<a name="method.summary"></a>
<A NAME="wait-long-"></A>
<a id="toString--"></a>
<a name="wait-long-"></a>
<a href="other.html">not an anchor</a>
"#;
        let parser = AnchorParser::new().unwrap();
        let records = parser.parse(page);
        let names: Vec<&str> = records.iter().map(|r| r.anchor_name()).collect();

        assert_eq!(
            names,
            vec!["wait-long-", "toString--", "wait-long-", "navbar.top", "method.summary"]
        );
        assert_eq!(records[0].display_name(), "wait(long)");
    }
}
