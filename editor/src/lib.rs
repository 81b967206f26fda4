//! Editing operations over a physics asset.
//!
//! A [`GraphEditor`] owns the asset being edited together with the skeleton and
//! skin vertices it is built from. Every structural edit goes through it so that
//! bodies, joints and the collision exclusion table stay consistent:
//!
//! - skeleton import and single-bone body creation,
//! - deleting bodies (children re-jointed to the grandparent), shapes and joints,
//! - welding adjacent bodies,
//! - mirroring left/right,
//! - collision toggles, copy/paste of settings, joint presets, repair passes.

mod editor;
mod naming;
mod ops {
    pub mod build;
    pub mod clipboard;
    pub mod collision;
    pub mod constraints;
    pub mod delete;
    pub mod make_body;
    pub mod mirror;
    pub mod repair;
    pub mod weld;
}
pub mod settings;

pub use editor::{GraphEditor, Selection};
pub use naming::MirrorNaming;
pub use ops::mirror::mirror_rotation;
pub use settings::CreateParams;
