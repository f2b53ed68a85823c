//! Deferred loading.
//!
//! A loader needs the viewport size to pre-scale, and the viewport is only
//! known once the view has been laid out. A load issued before that is
//! parked in a [`LoadRequest`] and resolved the first time the view reports
//! a nonzero size.

use super::Model;

/// A load that may still be waiting for the view size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadRequest {
    /// Waiting for a nonzero view size.
    Pending(Model),
    /// Nothing to do.
    #[default]
    Ready,
}

/// Outcome of asking a view to load a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The bitmap was loaded and installed.
    Loaded,
    /// The view has no size yet; the load runs on the next layout.
    Deferred,
}

impl LoadRequest {
    pub fn pending(model: Model) -> Self {
        LoadRequest::Pending(model)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LoadRequest::Pending(_))
    }

    /// Take the parked model if the view now has a size.
    ///
    /// Resolves at most once; afterwards the request is [`LoadRequest::Ready`].
    pub fn resolve(&mut self, view_width: u32, view_height: u32) -> Option<Model> {
        if view_width == 0 || view_height == 0 {
            return None;
        }
        match std::mem::take(self) {
            LoadRequest::Pending(model) => Some(model),
            LoadRequest::Ready => None,
        }
    }
}
