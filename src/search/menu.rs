//! Command menu stage.
//!
//! Menus are plain text, one item per line:
//!
//! ```text
//! @1:search(Docjar) -> http://www.docjar.com/s.jsp?q=##CLASS_NAME##
//! ```
//!
//! `##NAME##` placeholders are filled in from the selected package, class
//! and member. Unknown placeholders expand to nothing.

use crate::catalog::{MemberRecord, NameRecord};
use crate::query::state::MENU_SEPARATOR;
use crate::search::{Content, SearchContext, TopMember};
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use tracing::warn;

/// Menu entry with an unexpanded URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub mnemonic: String,
    pub label: String,
    pub url_template: String,
}

/// Menu entry resolved against the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub mnemonic: String,
    pub label: String,
    pub url: String,
}

/// Parsed menu definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuDefinition {
    entries: Vec<MenuEntry>,
}

impl MenuDefinition {
    /// Parse `mnemonic:label -> url` lines, skipping blank and malformed ones.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let entry = parse_line(line);
                if entry.is_none() {
                    warn!(line, "ignoring malformed menu line");
                }
                entry
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }
}

fn parse_line(line: &str) -> Option<MenuEntry> {
    let (item, url_template) = line.split_once("->")?;
    let (mnemonic, label) = item.split_once(':')?;

    let mnemonic = mnemonic.trim();
    let mnemonic = if mnemonic.starts_with(MENU_SEPARATOR) {
        mnemonic.to_string()
    } else {
        format!("{}{}", MENU_SEPARATOR, mnemonic)
    };

    Some(MenuEntry {
        mnemonic,
        label: label.trim().to_string(),
        url_template: url_template.trim().to_string(),
    })
}

/// Value of one `##NAME##` placeholder
fn placeholder_value(name: &str, owner: &NameRecord, member: Option<&MemberRecord>) -> String {
    match name {
        "CLASS_NAME" => owner.class_name().to_string(),
        "PACKAGE_NAME" => owner.package_name().to_string(),
        "PACKAGE_PATH" => owner.package_name().replace('.', "/"),
        "MEMBER_NAME" | "ANCHOR_NAME" | "METHOD_NAME" | "FIELD_NAME" => member
            .map(|m| m.member_name().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

pub struct MenuStage {
    class_menu: MenuDefinition,
    package_menu: MenuDefinition,
    placeholder: Regex,
}

impl MenuStage {
    pub fn new(class_menu: &str, package_menu: &str) -> Result<Self> {
        Ok(Self {
            class_menu: MenuDefinition::parse(class_menu),
            package_menu: MenuDefinition::parse(package_menu),
            placeholder: Regex::new(r"##(\w+)##").context("Failed to compile placeholder pattern")?,
        })
    }

    /// Menu items for the given selection
    pub fn items(&self, owner: &NameRecord, member: Option<&MemberRecord>) -> Vec<MenuItem> {
        let definition = if owner.is_package() {
            &self.package_menu
        } else {
            &self.class_menu
        };

        definition
            .entries()
            .iter()
            .map(|entry| MenuItem {
                mnemonic: entry.mnemonic.clone(),
                label: entry.label.clone(),
                url: self
                    .placeholder
                    .replace_all(&entry.url_template, |caps: &Captures| {
                        placeholder_value(&caps[1], owner, member)
                    })
                    .into_owned(),
            })
            .collect()
    }

    pub fn perform(&self, ctx: &mut SearchContext, query: Option<&str>) {
        let Some(query) = query else {
            return;
        };
        let Some(owner) = ctx.top_name.clone() else {
            return;
        };
        if ctx.members_loading || ctx.top_member == TopMember::NoMatch {
            return;
        }

        let member = match &ctx.top_member {
            TopMember::Found(member) => Some(member.clone()),
            _ => None,
        };
        let items = self.items(&owner, member.as_ref());

        if !query.is_empty() {
            let mnemonic = format!("{}{}", MENU_SEPARATOR, query);
            ctx.opened_url = items
                .iter()
                .find(|item| item.mnemonic == mnemonic)
                .map(|item| item.url.clone());
        }

        ctx.set_render(move || Content::Menu {
            owner,
            member,
            items,
        });
    }
}
