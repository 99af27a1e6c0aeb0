use tracing::debug;

use super::collections::{Collection, Collections};

/// An edit applied to a [`CollectionsManager`].
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionEdit {
    /// Append every collection, even when its name already exists.
    Add(Collections),
    /// Union same-named collections by beatmap hash; append the rest.
    AddOrMerge(Collections),
    /// Remove every collection.
    Clear,
    /// Remove every collection whose name is listed.
    Remove(Vec<String>),
    /// Rename the first collection named `old`. Merges into `new` if that name exists.
    Rename { old: String, new: String },
}

/// Owns a collection set and applies edits to it.
///
/// Passed explicitly to whoever generates or edits collections; there is no
/// process-wide instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionsManager {
    collections: Collections,
}

impl CollectionsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collections(collections: Collections) -> Self {
        Self { collections }
    }

    pub fn edit(&mut self, edit: CollectionEdit) {
        match edit {
            CollectionEdit::Add(incoming) => {
                debug!("Adding {} collections", incoming.len());
                self.collections.extend(incoming);
            }
            CollectionEdit::AddOrMerge(incoming) => {
                debug!("Adding or merging {} collections", incoming.len());
                for collection in incoming {
                    self.add_or_merge(collection);
                }
            }
            CollectionEdit::Clear => self.collections.clear(),
            CollectionEdit::Remove(names) => {
                self.collections.retain(|c| !names.contains(&c.name));
            }
            CollectionEdit::Rename { old, new } => self.rename(&old, new),
        }
    }

    fn add_or_merge(&mut self, collection: Collection) {
        match self.get_mut(&collection.name) {
            Some(existing) => existing.union_with(&collection),
            None => self.collections.push(collection),
        }
    }

    fn rename(&mut self, old: &str, new: String) {
        if old == new {
            return;
        }
        let Some(index) = self.collections.iter().position(|c| c.name == old) else {
            return;
        };
        if self.get(&new).is_some() {
            let removed = self.collections.remove(index);
            if let Some(target) = self.get_mut(&new) {
                target.union_with(&removed);
            }
        } else {
            self.collections[index].name = new;
        }
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.iter_mut().find(|c| c.name == name)
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn into_collections(self) -> Collections {
        self.collections
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Number of beatmap entries across all collections.
    pub fn beatmap_count(&self) -> usize {
        self.collections.iter().map(Collection::len).sum()
    }
}

/// Applies `edit` to a copy of `existing` and returns the result.
pub fn merge(existing: Collections, edit: CollectionEdit) -> Collections {
    let mut manager = CollectionsManager::with_collections(existing);
    manager.edit(edit);
    manager.into_collections()
}
