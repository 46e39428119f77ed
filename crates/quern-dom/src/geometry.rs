//! Element geometry
//!
//! Offset box, offset-parent chain, and scroll position. There is no
//! layout engine in this workspace; geometry is data the host assigns.

use crate::NodeId;

/// Host-supplied geometry for one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    /// Left edge relative to the offset parent
    pub offset_left: f64,
    /// Top edge relative to the offset parent
    pub offset_top: f64,
    /// Border-box width in px
    pub offset_width: f64,
    /// Border-box height in px
    pub offset_height: f64,
    /// Nearest positioned ancestor (NONE terminates the chain)
    pub offset_parent: NodeId,
    /// Vertical scroll position in px
    pub scroll_top: f64,
}

impl Default for ElementGeometry {
    fn default() -> Self {
        Self {
            offset_left: 0.0,
            offset_top: 0.0,
            offset_width: 0.0,
            offset_height: 0.0,
            offset_parent: NodeId::NONE,
            scroll_top: 0.0,
        }
    }
}

impl ElementGeometry {
    /// Geometry placed at an offset with the given box size
    pub fn at(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            offset_left: left,
            offset_top: top,
            offset_width: width,
            offset_height: height,
            ..Self::default()
        }
    }

    /// Same geometry with an offset parent attached
    pub fn with_offset_parent(mut self, parent: NodeId) -> Self {
        self.offset_parent = parent;
        self
    }
}
