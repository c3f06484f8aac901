//! Tags and ordered tag sets.
//!
//! Tag names are canonicalised to always carry the leading `@`, so
//! `Tag::new("smoke")` and `Tag::new("@smoke")` compare equal. [`Tags`]
//! preserves insertion order for rendering while deduplicating by name.

use std::fmt;

use crate::filter::TagFilter;

/// A labelled marker (`@name`) used for filtering and scoping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    name: String,
}

impl Tag {
    /// Create a tag, trimming whitespace and prepending `@` when missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_audit::model::Tag;
    ///
    /// assert_eq!(Tag::new("smoke").name(), "@smoke");
    /// assert_eq!(Tag::new(" @smoke "), Tag::new("smoke"));
    /// ```
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        let trimmed = name.as_ref().trim();
        let name = if trimmed.starts_with('@') {
            trimmed.to_owned()
        } else {
            format!("@{trimmed}")
        };
        Self { name }
    }

    /// The canonical tag name, including the leading `@`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An insertion-ordered set of [`Tag`]s, deduplicated by canonical name.
///
/// Derived equality is order-sensitive (the rendered order matters); use
/// [`Tags::set_eq`] where only membership matters, such as Examples scope
/// comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    entries: Vec<Tag>,
}

impl Tags {
    /// Create an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, returning `false` when an equal tag is already present.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.entries.contains(&tag) {
            return false;
        }
        self.entries.push(tag);
        true
    }

    /// Remove a tag by equality; absent tags are ignored.
    pub fn remove(&mut self, tag: &Tag) {
        self.entries.retain(|existing| existing != tag);
    }

    /// Whether an equal tag is present.
    #[must_use]
    pub fn contains(&self, tag: &Tag) -> bool {
        self.entries.contains(tag)
    }

    /// Whether a tag with the given (canonicalised) name is present.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.contains(&Tag::new(name))
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate tags in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.entries.iter()
    }

    /// Membership-only equality: same names, any order.
    #[must_use]
    pub fn set_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|tag| other.contains(tag))
    }
}

impl Extend<Tag> for Tags {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut tags = Self::new();
        tags.extend(iter);
        tags
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, tag) in self.entries.iter().enumerate() {
            if position > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}

/// Common behaviour for model entities that carry a tag set.
pub trait HasTags {
    /// The entity's tag set.
    fn tags(&self) -> &Tags;

    /// Mutable access to the entity's tag set.
    fn tags_mut(&mut self) -> &mut Tags;

    /// Whether the entity carries at least one tag.
    fn has_tags(&self) -> bool {
        !self.tags().is_empty()
    }

    /// Whether the entity carries a tag with the given name.
    fn has_tag(&self, name: &str) -> bool {
        self.tags().contains_name(name)
    }

    /// Add a tag, ignoring duplicates.
    fn add_tag(&mut self, tag: Tag) {
        self.tags_mut().insert(tag);
    }

    /// Add every tag from `tags`, ignoring duplicates.
    fn add_tags<I: IntoIterator<Item = Tag>>(&mut self, tags: I) {
        self.tags_mut().extend(tags);
    }

    /// Remove every tag present in `tags`.
    fn remove_tags(&mut self, tags: &Tags) {
        for tag in tags {
            self.tags_mut().remove(tag);
        }
    }

    /// Whether this entity's tags satisfy a single filter.
    fn accepts_tag_filter(&self, filter: &TagFilter) -> bool {
        filter.is_satisfied_by(self.tags())
    }

    /// Whether this entity's tags satisfy every filter in `filters`.
    fn accepts_tag_filters(&self, filters: &[TagFilter]) -> bool {
        filters.iter().all(|filter| self.accepts_tag_filter(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalises_missing_at_sign() {
        assert_eq!(Tag::new("smoke").name(), "@smoke");
        assert_eq!(Tag::new("@smoke").name(), "@smoke");
        assert_eq!(Tag::new("  wip  ").name(), "@wip");
    }

    #[test]
    fn insert_deduplicates_by_name() {
        let mut tags = Tags::new();
        assert!(tags.insert(Tag::new("smoke")));
        assert!(!tags.insert(Tag::new("@smoke")));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn set_eq_ignores_order() {
        let forward: Tags = [Tag::new("a"), Tag::new("b")].into_iter().collect();
        let reversed: Tags = [Tag::new("b"), Tag::new("a")].into_iter().collect();
        assert!(forward.set_eq(&reversed));
        assert_ne!(forward, reversed);
    }

    #[test]
    fn renders_space_separated_in_insertion_order() {
        let tags: Tags = [Tag::new("b"), Tag::new("a")].into_iter().collect();
        assert_eq!(tags.to_string(), "@b @a");
    }
}
