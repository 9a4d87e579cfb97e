//! Category types for product organization.
//!
//! The catalog is a two-level tree: top-level categories with an ordered list
//! of children. Children never have children of their own.

use crate::ids::CategoryId;
use crate::wire;
use serde::{Deserialize, Serialize};

/// A child entry in the category tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryChild {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A category as returned by the tree and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Backend category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL-stable identifier.
    pub slug: String,
    /// Ordered subcategories.
    #[serde(default, deserialize_with = "wire::lenient_vec")]
    pub children: Vec<CategoryChild>,
    /// Parent id, set on the detail endpoint when this is a subcategory.
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Parent name, set on the detail endpoint when this is a subcategory.
    #[serde(default, deserialize_with = "wire::optional_string")]
    pub parent_name: Option<String>,
    /// Parent slug, set on the detail endpoint when this is a subcategory.
    #[serde(default, deserialize_with = "wire::optional_string")]
    pub parent_slug: Option<String>,
}

impl Category {
    /// Create a top-level category with no children.
    pub fn new_root(id: CategoryId, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            children: Vec::new(),
            parent_id: None,
            parent_name: None,
            parent_slug: None,
        }
    }

    /// Append a child category.
    pub fn with_child(
        mut self,
        id: CategoryId,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        self.children.push(CategoryChild {
            id,
            name: name.into(),
            slug: slug.into(),
        });
        self
    }

    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none() && self.parent_slug.is_none()
    }

    /// The identity triple used by homepage sections.
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }

    /// Whether `slug` names this category (case-insensitive).
    pub fn matches_slug(&self, slug: &str) -> bool {
        self.slug.eq_ignore_ascii_case(slug)
    }
}

/// A known top-level category: identity, display name and slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

impl CategorySummary {
    pub fn new(id: CategoryId, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// Where a slug was found in the category tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeMatch<'a> {
    /// The slug names a top-level category.
    TopLevel(&'a Category),
    /// The slug names a child of `parent`.
    Child {
        parent: &'a Category,
        child: &'a CategoryChild,
    },
}

impl<'a> TreeMatch<'a> {
    /// The top-level category of the match.
    pub fn parent(&self) -> &'a Category {
        match self {
            TreeMatch::TopLevel(category) => category,
            TreeMatch::Child { parent, .. } => parent,
        }
    }

    /// Display name of the matched category itself.
    pub fn name(&self) -> &'a str {
        match self {
            TreeMatch::TopLevel(category) => &category.name,
            TreeMatch::Child { child, .. } => &child.name,
        }
    }
}

/// Look up a slug among top-level categories first, then their children.
pub fn find_in_tree<'a>(tree: &'a [Category], slug: &str) -> Option<TreeMatch<'a>> {
    if let Some(top) = tree.iter().find(|c| c.matches_slug(slug)) {
        return Some(TreeMatch::TopLevel(top));
    }
    tree.iter().find_map(|parent| {
        parent
            .children
            .iter()
            .find(|child| child.slug.eq_ignore_ascii_case(slug))
            .map(|child| TreeMatch::Child { parent, child })
    })
}
