//! Pan/zoom viewports and a note-and-connection graph for tabletop surfaces.
//!
//! The crate owns the state behind each navigable surface: a shared store of
//! per-instance viewports, gesture controllers that translate pointer and
//! wheel input into viewport changes, and a graph of freely positioned notes
//! joined by curved connections. The host UI layer is responsible only for
//! wiring DOM events to a [`engine::SurfaceCore`], drawing the
//! [`scene::Scene`] it describes, and persisting the resulting
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`viewport`] | Keyed store of per-instance pan/zoom state |
//! | [`gesture`] | Pan and wheel-zoom controllers bound to one instance |
//! | [`graph`] | Notes, connections, selection and the connect gesture |
//! | [`curve`] | Bézier geometry between notes |
//! | [`engine`] | Testable surface engine that routes input to the above |
//! | [`scene`] | Serializable per-frame description for the renderer |
//! | [`camera`] | Points, viewports and coordinate conversions |
//! | [`input`] | Input event types and the surface gesture state machine |
//! | [`hit`] | Hit-testing against notes and their handles |
//! | [`config`] | Tunable limits, loaded from the environment |
//! | [`consts`] | Shared numeric constants (zoom limits, note sizes, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod curve;
pub mod engine;
pub mod gesture;
pub mod graph;
pub mod hit;
pub mod input;
pub mod scene;
pub mod viewport;
