//! Slices and tags: persisted subsets of a project's data.

use crate::predicate::FilterPredicateGroup;

/// Backend identifier of a slice.
pub type SliceId = i64;

/// Backend identifier of a tag.
pub type TagId = i64;

/// A named, persisted predicate group (an intensional subset).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Slice {
    /// Slice id.
    pub id: SliceId,
    /// Display name.
    pub slice_name: String,
    /// Folder the slice is filed under.
    #[cfg_attr(feature = "serde", serde(default))]
    pub folder_id: Option<i64>,
    /// The slice's predicate tree.
    pub filter_predicates: FilterPredicateGroup,
}

impl Slice {
    /// Creates a slice outside any folder.
    pub fn new(id: SliceId, name: impl Into<String>, filter_predicates: FilterPredicateGroup) -> Self {
        Self {
            id,
            slice_name: name.into(),
            folder_id: None,
            filter_predicates,
        }
    }

    /// Files the slice under a folder.
    pub fn in_folder(mut self, folder_id: i64) -> Self {
        self.folder_id = Some(folder_id);
        self
    }
}

/// A named, persisted explicit list of data-instance ids (an extensional
/// subset).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Tag {
    /// Tag id.
    pub id: TagId,
    /// Display name.
    pub tag_name: String,
    /// Tagged data-instance ids.
    #[cfg_attr(feature = "serde", serde(default))]
    pub data_ids: Vec<String>,
    /// Folder the tag is filed under.
    #[cfg_attr(feature = "serde", serde(default))]
    pub folder_id: Option<i64>,
}

impl Tag {
    /// Creates a tag outside any folder.
    pub fn new<I, S>(id: TagId, name: impl Into<String>, data_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            tag_name: name.into(),
            data_ids: data_ids.into_iter().map(Into::into).collect(),
            folder_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_folder() {
        let slice = Slice::new(3, "short", FilterPredicateGroup::empty()).in_folder(9);
        assert_eq!(slice.folder_id, Some(9));
        assert_eq!(slice.slice_name, "short");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_tag_wire_format() {
        let tag: Tag =
            serde_json::from_str(r#"{"id":4,"tagName":"hard","dataIds":["a","b"],"folderId":null}"#)
                .unwrap();
        assert_eq!(tag, Tag::new(4, "hard", ["a", "b"]));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_slice_wire_format() {
        let json = r#"{"id":1,"sliceName":"all","filterPredicates":{"predicates":[],"join":""}}"#;
        let slice: Slice = serde_json::from_str(json).unwrap();
        assert_eq!(slice.id, 1);
        assert!(slice.filter_predicates.is_empty());
        assert_eq!(slice.folder_id, None);
    }
}
