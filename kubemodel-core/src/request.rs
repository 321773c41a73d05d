//! Request builder for patch requests
use crate::{
    patch::{Patch, PatchBuilder, PatchParams},
    tracking::Tracked,
    Error, Resource, Result,
};

/// A Kubernetes request builder
///
/// Takes a base_path and supplies constructors for patch requests.
/// The operations all return `http::Request` objects; sending them is up to the caller.
#[derive(Debug, Clone)]
pub struct Request {
    /// The path component of a url
    pub url_path: String,
}

impl Request {
    /// New request with a resource's url path
    pub fn new<S: Into<String>>(url_path: S) -> Self {
        Self {
            url_path: url_path.into(),
        }
    }

    /// New request for a resource type, in a namespace when it is namespaced
    pub fn for_resource<K: Resource>(namespace: Option<&str>) -> Self {
        Self::new(K::url_path(namespace))
    }
}

impl Request {
    /// Patch an instance of a resource
    ///
    /// Requires a named resource
    pub fn patch<P: serde::Serialize>(
        &self,
        name: &str,
        pp: &PatchParams,
        patch: &Patch<P>,
    ) -> Result<http::Request<Vec<u8>>> {
        pp.validate(patch)?;
        let target = format!("{}/{}?", self.url_path, name);
        let mut qp = form_urlencoded::Serializer::new(target);
        pp.populate_qp(&mut qp);
        let urlstr = qp.finish();

        http::Request::patch(urlstr)
            .header(http::header::ACCEPT, "application/json")
            .header(http::header::CONTENT_TYPE, patch.content_type())
            .body(patch.serialize()?)
            .map_err(Error::HttpError)
    }

    /// Patch an instance with the changes recorded on `obj`
    ///
    /// The patch is built first; when building fails no request is produced.
    #[tracing::instrument(skip_all, fields(url = %self.url_path, name = %name))]
    pub fn patch_tracked(
        &self,
        name: &str,
        pp: &PatchParams,
        builder: &PatchBuilder,
        obj: &dyn Tracked,
    ) -> Result<http::Request<Vec<u8>>> {
        let patch = builder.build(obj)?;
        tracing::debug!(content_type = patch.content_type(), "built patch request");
        self.patch(name, pp, &patch)
    }
}

/// Subresources
impl Request {
    /// Patch an instance of the subresource
    pub fn patch_subresource<P: serde::Serialize>(
        &self,
        subresource_name: &str,
        name: &str,
        pp: &PatchParams,
        patch: &Patch<P>,
    ) -> Result<http::Request<Vec<u8>>> {
        pp.validate(patch)?;
        let target = format!("{}/{}/{}?", self.url_path, name, subresource_name);
        let mut qp = form_urlencoded::Serializer::new(target);
        pp.populate_qp(&mut qp);
        let urlstr = qp.finish();

        http::Request::patch(urlstr)
            .header(http::header::ACCEPT, "application/json")
            .header(http::header::CONTENT_TYPE, patch.content_type())
            .body(patch.serialize()?)
            .map_err(Error::HttpError)
    }
}
