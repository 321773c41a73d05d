//! Generic objectlist wrapper.
use crate::{
    metadata::{ListMeta, TypeMeta},
    schema::ListItemKind,
    tracking::Tracked,
    Resource,
};
use serde::{Deserialize, Serialize};

/// A generic Kubernetes object list
///
/// This is used instead of a full struct for `DeploymentList`, `PodList`, etc.
/// Items keep their own change tracking; the list itself is a plain container.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ObjectList<T>
where
    T: Clone,
{
    /// `apiVersion` and `kind` of the list, e.g. `v1` and `PodList`
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub types: Option<TypeMeta>,

    /// ListMeta - only really used for its `resourceVersion`
    #[serde(default)]
    pub metadata: ListMeta,

    /// The items we are actually interested in.
    #[serde(bound(deserialize = "Vec<T>: Deserialize<'de>"), default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T: Clone> ObjectList<T> {
    /// A list holding `items`
    pub fn new(items: Vec<T>) -> Self {
        Self {
            types: None,
            metadata: ListMeta::default(),
            items,
        }
    }

    /// `iter` returns an Iterator over the elements of this ObjectList
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// `iter_mut` returns an Iterator of mutable references to the elements of this ObjectList
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }
}

impl<T: Clone + Resource> ObjectList<T> {
    /// A list of resources with `apiVersion` and `kind` filled in as the api server would
    pub fn of_resources(items: Vec<T>) -> Self {
        Self {
            types: Some(TypeMeta {
                api_version: T::API_VERSION.into(),
                kind: format!("{}List", T::KIND),
            }),
            ..Self::new(items)
        }
    }

    /// The kind of the items, e.g. `Pod`/`v1` for a `PodList`
    pub fn item_kind(&self) -> ListItemKind {
        ListItemKind {
            kind: T::KIND,
            version: T::VERSION,
        }
    }
}

impl<T: Clone + Tracked> ObjectList<T> {
    /// Items with changes that have not been sent
    pub fn dirty_items(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|i| i.is_dirty())
    }
}

impl<T: Clone> IntoIterator for ObjectList<T> {
    type IntoIter = ::std::vec::IntoIter<Self::Item>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T: Clone> IntoIterator for &'a ObjectList<T> {
    type IntoIter = ::std::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T: Clone> IntoIterator for &'a mut ObjectList<T> {
    type IntoIter = ::std::slice::IterMut<'a, T>;
    type Item = &'a mut T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{metadata::ObjectMeta, tracking::ModificationSet};
    use kubemodel_derive::Tracked;
    use serde_json::json;

    #[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
    #[tracked(crates(kubemodel_core = "crate"), kind = "Widget", group = "example.dev", version = "v2")]
    #[serde(rename_all = "camelCase", default)]
    struct Widget {
        api_version: String,
        kind: String,
        #[tracked(object)]
        metadata: ObjectMeta,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<i32>,
        #[serde(skip)]
        modifications: ModificationSet,
    }

    #[test]
    fn list_envelope() {
        let mut list: ObjectList<Widget> = serde_json::from_value(json!({
            "apiVersion": "example.dev/v2",
            "kind": "WidgetList",
            "metadata": {"resourceVersion": "7"},
            "items": [{"metadata": {"name": "a"}}, {"metadata": {"name": "b"}, "size": 2}],
        }))
        .unwrap();
        assert_eq!(list.types.as_ref().unwrap().kind, "WidgetList");
        assert_eq!(list.item_kind(), ListItemKind { kind: "Widget", version: "v2" });
        assert_eq!(list.dirty_items().count(), 0);

        if let Some(w) = list.iter_mut().find(|w| w.size().is_none()) {
            w.set_size(1);
        }
        let dirty: Vec<_> = list.dirty_items().map(|w| w.metadata().name()).collect();
        assert_eq!(dirty, vec![Some("a")]);
    }

    #[test]
    fn resource_lists_carry_type_meta() {
        let list = ObjectList::of_resources(vec![Widget::default()]);
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["apiVersion"], "example.dev/v2");
        assert_eq!(value["kind"], "WidgetList");
        assert_eq!(value["items"][0]["kind"], "Widget");
    }
}
