//! Patch documents and the parameters of patch calls.
//!
//! [`PatchBuilder`] turns the recorded modifications of a tracked object into a patch body,
//! [`diff`] computes one from two snapshots and [`apply`] previews the effect of a patch locally.
use crate::{Error, Result};
use serde::Serialize;

pub mod apply;
mod builder;
pub mod diff;

pub use builder::{PatchBuilder, PatchKind};

/// Directive inserted into list and object patches of a strategic merge
pub const PATCH_DIRECTIVE: &str = "$patch";
/// Key of the `retainKeys` directive
pub const RETAIN_KEYS_DIRECTIVE: &str = "$retainKeys";
/// Prefix of the directive removing values from a merge-strategy primitive list
pub const DELETE_FROM_PRIMITIVE_LIST_PREFIX: &str = "$deleteFromPrimitiveList/";

/// Describes changes that should be applied to a resource
///
/// Takes arbitrary serializable data for all strategies except `Json`.
///
/// The body for tracked objects is usually produced by [`PatchBuilder`]:
///
/// ```
/// use kubemodel_core::{patch::PatchBuilder, metadata::ObjectMeta};
/// let mut meta = ObjectMeta::default();
/// meta.labels_mut().insert("app", "web".to_string());
/// let patch = PatchBuilder::merge().build(&meta).unwrap();
/// assert_eq!(patch.content_type(), "application/merge-patch+json");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub enum Patch<T: Serialize> {
    /// [Server side apply](https://kubernetes.io/docs/reference/using-api/api-concepts/#server-side-apply)
    ///
    /// The body is the fully specified intent of the field manager rather than a delta.
    Apply(T),

    /// [JSON patch](https://kubernetes.io/docs/tasks/manage-kubernetes-objects/update-api-object-kubectl-patch/)
    ///
    /// Using this variant will require you to explicitly provide a type for `T` at the moment.
    Json(json_patch::Patch),

    /// [JSON Merge patch](https://kubernetes.io/docs/tasks/manage-kubernetes-objects/update-api-object-kubectl-patch/#use-a-json-merge-patch-to-update-a-deployment)
    Merge(T),
    /// [Strategic JSON Merge patch](https://kubernetes.io/docs/tasks/manage-kubernetes-objects/update-api-object-kubectl-patch/#use-a-strategic-merge-patch-to-update-a-deployment)
    Strategic(T),
}

impl<T: Serialize> Patch<T> {
    /// Whether this is a server side apply
    pub fn is_apply(&self) -> bool {
        matches!(self, Patch::Apply(_))
    }

    /// The `Content-Type` header the api server expects for this patch
    pub fn content_type(&self) -> &'static str {
        match &self {
            Self::Apply(_) => "application/apply-patch+yaml",
            Self::Json(_) => "application/json-patch+json",
            Self::Merge(_) => "application/merge-patch+json",
            Self::Strategic(_) => "application/strategic-merge-patch+json",
        }
    }

    /// The body of an `Apply`, `Merge` or `Strategic` patch
    pub fn body(&self) -> Option<&T> {
        match self {
            Self::Apply(p) | Self::Merge(p) | Self::Strategic(p) => Some(p),
            Self::Json(_) => None,
        }
    }

    /// Serialize the body as sent on the wire
    pub fn serialize(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            // json is a subset of yaml, so apply bodies are sent as json too
            Self::Apply(p) => serde_json::to_vec(p),
            Self::Json(p) => serde_json::to_vec(p),
            Self::Strategic(p) => serde_json::to_vec(p),
            Self::Merge(p) => serde_json::to_vec(p),
        }
    }
}

/// The validation directive to use for `fieldValidation` when patching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationDirective {
    /// Strict mode will fail any invalid manifests.
    ///
    /// This will fail the request with a BadRequest error if any unknown fields would be dropped from the
    /// object, or if any duplicate fields are present.
    Strict,
    /// Warn mode will return a warning for invalid manifests.
    ///
    /// Each unknown or duplicate field is reported through the standard warning response header.
    Warn,
    /// Ignore mode will silently ignore any problems.
    Ignore,
}

impl ValidationDirective {
    /// Returns the string format of the directive
    pub fn as_str(&self) -> &str {
        match self {
            Self::Strict => "Strict",
            Self::Warn => "Warn",
            Self::Ignore => "Ignore",
        }
    }
}

/// Common query parameters for patch calls
#[derive(Default, Clone, Debug, PartialEq)]
pub struct PatchParams {
    /// Whether to run this as a dry run
    pub dry_run: bool,
    /// force Apply requests. Applicable only to [`Patch::Apply`].
    pub force: bool,
    /// fieldManager is a name of the actor that is making changes. Required for [`Patch::Apply`]
    /// optional for everything else.
    pub field_manager: Option<String>,
    /// The server-side validation directive to use.
    pub field_validation: Option<ValidationDirective>,
}

impl PatchParams {
    /// Check the parameters against the patch they are sent with
    pub fn validate<P: Serialize>(&self, patch: &Patch<P>) -> Result<()> {
        if let Some(field_manager) = &self.field_manager {
            // the api server does the complete validation
            if field_manager.len() > 128 {
                return Err(Error::Validation(
                    "Failed to validate PatchParams::field_manager!".into(),
                ));
            }
        }
        if self.force && !patch.is_apply() {
            return Err(Error::Validation(
                "PatchParams::force only works with Patch::Apply".into(),
            ));
        }
        if patch.is_apply() && self.field_manager.is_none() {
            return Err(Error::Validation(
                "PatchParams::field_manager is required for Patch::Apply".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn populate_qp(&self, qp: &mut form_urlencoded::Serializer<String>) {
        if self.dry_run {
            qp.append_pair("dryRun", "All");
        }
        if self.force {
            qp.append_pair("force", "true");
        }
        if let Some(ref fm) = self.field_manager {
            qp.append_pair("fieldManager", fm);
        }
        if let Some(sv) = &self.field_validation {
            qp.append_pair("fieldValidation", sv.as_str());
        }
    }

    /// Construct `PatchParams` for server-side apply
    #[must_use]
    pub fn apply(manager: &str) -> Self {
        Self {
            field_manager: Some(manager.into()),
            ..Self::default()
        }
    }

    /// Force the result through on conflicts
    ///
    /// NB: Force is a concept restricted to the server-side [`Patch::Apply`].
    #[must_use]
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    /// Perform a dryRun only
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Set the field manager
    #[must_use]
    pub fn manager(mut self, manager: &str) -> Self {
        self.field_manager = Some(manager.into());
        self
    }

    /// Set the validation directive for `fieldValidation`.
    #[must_use]
    pub fn validation(mut self, vd: ValidationDirective) -> Self {
        self.field_validation = Some(vd);
        self
    }

    /// Set the validation directive to `Ignore`
    #[must_use]
    pub fn validation_ignore(self) -> Self {
        self.validation(ValidationDirective::Ignore)
    }

    /// Set the validation directive to `Warn`
    #[must_use]
    pub fn validation_warn(self) -> Self {
        self.validation(ValidationDirective::Warn)
    }

    /// Set the validation directive to `Strict`
    #[must_use]
    pub fn validation_strict(self) -> Self {
        self.validation(ValidationDirective::Strict)
    }
}
