//! `--verbose` trace output: one YAML event per source/destination/
//! generate/expand/close callback, grounded on
//! `original_source/include/warthog/io/listener.h`'s event shape.

use pathfinding::{GridMap, PackedId, PaddedId, SearchListener};

pub struct YamlTraceListener<'m> {
    map: &'m GridMap,
}

impl<'m> YamlTraceListener<'m> {
    pub fn new(map: &'m GridMap) -> Self {
        YamlTraceListener { map }
    }

    fn xy(&self, id: PaddedId) -> (u32, u32) {
        self.map.packed_to_xy(self.map.to_packed(id))
    }
}

impl SearchListener for YamlTraceListener<'_> {
    fn on_source(&mut self, id: PackedId) {
        let (x, y) = self.map.packed_to_xy(id);
        println!("- {{ type: source, id: {}, x: {}, y: {} }}", id.raw(), x, y);
    }

    fn on_destination(&mut self, id: PackedId) {
        let (x, y) = self.map.packed_to_xy(id);
        println!("- {{ type: destination, id: {}, x: {}, y: {} }}", id.raw(), x, y);
    }

    fn on_generate(&mut self, _parent: Option<PaddedId>, node: PaddedId, g: f64) {
        let (x, y) = self.xy(node);
        println!("- {{ type: generate, id: {}, x: {}, y: {}, g: {:.6} }}", node.raw(), x, y, g);
    }

    fn on_expand(&mut self, node: PaddedId) {
        let (x, y) = self.xy(node);
        println!("- {{ type: expand, id: {}, x: {}, y: {} }}", node.raw(), x, y);
    }

    fn on_close(&mut self, node: PaddedId, g: f64) {
        let (x, y) = self.xy(node);
        println!("- {{ type: close, id: {}, x: {}, y: {}, g: {:.6} }}", node.raw(), x, y, g);
    }
}
