//! Site and page data holders with in-memory indexes.

use std::collections::HashMap;

use portal_ident::{PageId, Permission, SiteId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attributes::Attributes;
use crate::query::SiteQuery;

/// A portal site, space or dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Site identifier.
    pub id: SiteId,
    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Locale tag (`en`, `fr-CA`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Skin name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<String>,
    /// Who may view the site.
    #[serde(default)]
    pub access_permission: Permission,
    /// Who may edit the site.
    #[serde(default = "Permission::nobody")]
    pub edit_permission: Permission,
    /// Site attributes.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Site {
    /// Site with default settings: visible to everyone, editable by nobody.
    #[must_use]
    pub fn new(id: SiteId) -> Self {
        Self {
            id,
            title: None,
            description: None,
            locale: None,
            skin: None,
            access_permission: Permission::everyone(),
            edit_permission: Permission::nobody(),
            attributes: Attributes::new(),
        }
    }

    /// Title, or the site name if none is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.id.name())
    }
}

/// A page of a site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page identifier.
    pub id: PageId,
    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Who may view the page.
    #[serde(default)]
    pub access_permission: Permission,
    /// Who may edit the page.
    #[serde(default = "Permission::nobody")]
    pub edit_permission: Permission,
    /// Page attributes.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Page {
    /// Page with default settings: visible to everyone, editable by nobody.
    #[must_use]
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            title: None,
            description: None,
            access_permission: Permission::everyone(),
            edit_permission: Permission::nobody(),
            attributes: Attributes::new(),
        }
    }

    /// Title, or the page name if none is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.id.name().to_string())
    }
}

/// Sites by identifier.
#[derive(Debug, Default)]
pub struct SiteIndex {
    sites: HashMap<SiteId, Site>,
}

impl SiteIndex {
    /// Empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `site`, returning the site it replaced.
    pub fn insert(&mut self, site: Site) -> Option<Site> {
        let id = site.id.clone();
        let previous = self.sites.insert(id, site);
        if let Some(previous) = &previous {
            warn!(site = %previous.id, "Site registered twice, replacing");
        } else {
            debug!(count = self.sites.len(), "Site registered");
        }
        previous
    }

    /// Site by identifier.
    #[must_use]
    pub fn get(&self, id: &SiteId) -> Option<&Site> {
        self.sites.get(id)
    }

    /// Mutable site by identifier.
    pub fn get_mut(&mut self, id: &SiteId) -> Option<&mut Site> {
        self.sites.get_mut(id)
    }

    /// Remove a site.
    pub fn remove(&mut self, id: &SiteId) -> Option<Site> {
        self.sites.remove(id)
    }

    /// Number of registered sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// True if no site is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Sites matching `query`, sorted by identifier and windowed by the
    /// query range.
    #[must_use]
    pub fn find(&self, query: &SiteQuery) -> Vec<&Site> {
        let mut matching: Vec<&Site> = self
            .sites
            .values()
            .filter(|site| query.matches(site.id.site_type()))
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));

        match query.range {
            Some(range) => range.apply(&matching).to_vec(),
            None => matching,
        }
    }
}

/// Pages by identifier.
#[derive(Debug, Default)]
pub struct PageIndex {
    pages: HashMap<PageId, Page>,
}

impl PageIndex {
    /// Empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `page`, returning the page it replaced.
    pub fn insert(&mut self, page: Page) -> Option<Page> {
        self.pages.insert(page.id.clone(), page)
    }

    /// Page by identifier.
    #[must_use]
    pub fn get(&self, id: &PageId) -> Option<&Page> {
        self.pages.get(id)
    }

    /// Remove a page.
    pub fn remove(&mut self, id: &PageId) -> Option<Page> {
        self.pages.remove(id)
    }

    /// Pages of `site`, sorted by name.
    #[must_use]
    pub fn pages_of(&self, site: &SiteId) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self
            .pages
            .values()
            .filter(|page| page.id.site_id() == site)
            .collect();
        pages.sort_by(|a, b| a.id.name().cmp(b.id.name()));
        pages
    }

    /// Remove every page of `site`, returning how many were removed.
    pub fn remove_site(&mut self, site: &SiteId) -> usize {
        let before = self.pages.len();
        self.pages.retain(|id, _| id.site_id() != site);
        before - self.pages.len()
    }

    /// Number of registered pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if no page is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
