//! HAL+JSON building blocks
//!
//! See: https://datatracker.ietf.org/doc/html/draft-kelly-json-hal-08

use serde::Serialize;
use std::collections::BTreeMap;

/// A HAL link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalLink {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl HalLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
            method: None,
        }
    }

    pub fn with_title(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: Some(title.into()),
            method: None,
        }
    }

    /// Add method to link
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// Links keyed by relation, serialized in a stable order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HalLinks(BTreeMap<String, HalLink>);

impl HalLinks {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn add(&mut self, rel: impl Into<String>, link: HalLink) {
        self.0.insert(rel.into(), link);
    }

    /// Builder pattern: add single link
    pub fn with(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.add(rel, link);
        self
    }

    pub fn get(&self, rel: &str) -> Option<&HalLink> {
        self.0.get(rel)
    }
}

/// A resource: `_type`, `_links` and the flattened representation
#[derive(Debug, Clone, Serialize)]
pub struct HalResource<T: Serialize> {
    #[serde(rename = "_type")]
    pub type_name: &'static str,
    #[serde(rename = "_links")]
    pub links: HalLinks,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> HalResource<T> {
    pub fn new(type_name: &'static str, data: T) -> Self {
        Self {
            type_name,
            links: HalLinks::new(),
            data,
        }
    }

    pub fn with_links(mut self, links: HalLinks) -> Self {
        self.links = links;
        self
    }

    pub fn with_link(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.links.add(rel, link);
        self
    }
}

/// Embedded elements plus collection-level fields
#[derive(Debug, Clone, Serialize)]
pub struct HalCollection<T: Serialize> {
    #[serde(rename = "_type")]
    pub type_name: &'static str,
    pub count: usize,
    #[serde(rename = "_links")]
    pub links: HalLinks,
    #[serde(rename = "_embedded")]
    pub embedded: Elements<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Elements<T: Serialize> {
    pub elements: Vec<T>,
}

impl<T: Serialize> HalCollection<T> {
    pub fn new(type_name: &'static str, elements: Vec<T>) -> Self {
        Self {
            type_name,
            count: elements.len(),
            links: HalLinks::new(),
            embedded: Elements { elements },
        }
    }

    pub fn with_link(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.links.add(rel, link);
        self
    }
}

/// Standard link relations
pub mod rels {
    pub const SELF: &str = "self";
    pub const CREATE: &str = "create";
    pub const PROJECT: &str = "project";
    pub const BUDGET_ITEMS: &str = "budgetItems";
    pub const EXPENSES: &str = "expenses";
    pub const PHOTO: &str = "photo";
}
