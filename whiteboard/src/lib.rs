//! Canvas engine for the collaborative whiteboard overlay.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns
//! the whiteboard document (an ordered list of drawable objects), translates
//! raw pointer/keyboard events into document mutations through a gesture
//! state machine, renders the scene to a 2D canvas, and serializes completed
//! mutations for the realtime channel. The host JavaScript layer is
//! responsible only for wiring DOM events to the engine and shuttling the
//! resulting [`engine::HostCommand`] payloads over the room socket.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Drawable object types and the ordered document store |
//! | [`geom`] | Bounding boxes, hit-testing, and resize handles |
//! | [`input`] | Tools, UI style state, and the gesture state machine |
//! | [`render`] | Full clear-and-redraw plus live gesture previews |
//! | [`sync`] | Wire schema and lenient decoding for the room channel |
//! | [`consts`] | Shared numeric constants (padding, handle radius, etc.) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod input;
pub mod render;
pub mod sync;
