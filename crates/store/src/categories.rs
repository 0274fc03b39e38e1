//! Two-level category tree, as the filter sidebar consumes it.

use std::collections::HashMap;

use api_types::category::CategoryResource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

/// A root category owning its child categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub id: String,
    pub name: String,
    pub children: Vec<Category>,
}

/// Organises the flat `/categories` listing into parents and children.
///
/// Pass one collects the roots (no parent reference) in listing order, pass
/// two appends each child to its parent. A child whose parent never showed
/// up in pass one is dropped without a trace; that mirrors the upstream app
/// and keeps malformed listings from growing phantom groups.
pub fn build_category_tree(resources: Vec<CategoryResource>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for resource in &resources {
        if resource.relationships.parent.data.is_none() {
            slots.insert(resource.id.clone(), groups.len());
            groups.push(CategoryGroup {
                id: resource.id.clone(),
                name: resource.attributes.name.clone(),
                children: Vec::new(),
            });
        }
    }

    for resource in resources {
        if let Some(parent) = resource.relationships.parent.data {
            if let Some(&slot) = slots.get(&parent.id) {
                groups[slot].children.push(Category {
                    id: resource.id,
                    name: resource.attributes.name,
                    parent_id: Some(parent.id),
                });
            }
        }
    }

    groups
}
