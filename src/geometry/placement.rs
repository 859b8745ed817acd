use super::{TemplateId, Transform};

/// One occurrence of a shape-template in the geometry tree (a physical volume).
///
/// A placement only knows the template of its parent. Which concrete placement of that template
/// is the actual parent is answered by the [`VolumeHierarchyIndex`](super::VolumeHierarchyIndex).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub template: TemplateId,

    /// Template of the enclosing volume, `None` for the world volume.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<TemplateId>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,

    /// Transform from this placement's frame into its parent's frame.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub transform: Transform,
}

impl Placement {
    pub fn new(template: TemplateId, parent: TemplateId, transform: Transform) -> Self {
        Self {
            template,
            parent: Some(parent),
            name: None,
            transform,
        }
    }

    /// A parentless placement with the identity transform.
    pub fn root(template: TemplateId) -> Self {
        Self {
            template,
            parent: None,
            name: None,
            transform: Transform::identity(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
