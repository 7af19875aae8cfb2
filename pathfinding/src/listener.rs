//! Optional observer hooks into `UnidirectionalSearch`.
//!
//! All-default-methods trait, per spec's redesign note about not forcing
//! every caller to pay for trace output. Grounded on
//! `original_source/include/warthog/io/listener.h`; the concrete
//! YAML-emitting listener lives in `gppc-bench` since it is the one
//! consumer that needs trace output at all.

use crate::ids::{PackedId, PaddedId};

pub trait SearchListener {
    fn on_source(&mut self, _id: PackedId) {}
    fn on_destination(&mut self, _id: PackedId) {}
    fn on_generate(&mut self, _parent: Option<PaddedId>, _node: PaddedId, _g: f64) {}
    fn on_expand(&mut self, _node: PaddedId) {}
    fn on_relax(&mut self, _node: PaddedId, _g: f64) {}
    fn on_close(&mut self, _node: PaddedId, _g: f64) {}
}
