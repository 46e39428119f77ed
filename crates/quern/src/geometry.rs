//! Geometry operations
//!
//! Reads come from host-supplied geometry on the first member; pixel
//! setters write both the inline style and the geometry record so the
//! getters stay coherent.

use crate::{Error, Selection};

impl Selection {
    /// Offset-box height of the first member
    pub fn height(&self) -> Option<f64> {
        let set = self.nodes()?;
        let id = self.first()?;
        Some(set.shared.doc.borrow().geometry(id).offset_height)
    }

    /// Write a pixel height to every member
    pub fn set_height(&self, px: f64) -> Selection {
        self.each(|doc, id| {
            doc.set_style(id, "height", &format!("{px}px"));
            let mut geometry = doc.geometry(id);
            geometry.offset_height = px;
            doc.set_geometry(id, geometry);
        })
    }

    /// Offset-box width of the first member
    pub fn width(&self) -> Option<f64> {
        let set = self.nodes()?;
        let id = self.first()?;
        Some(set.shared.doc.borrow().geometry(id).offset_width)
    }

    /// Write a pixel width to every member
    pub fn set_width(&self, px: f64) -> Selection {
        self.each(|doc, id| {
            doc.set_style(id, "width", &format!("{px}px"));
            let mut geometry = doc.geometry(id);
            geometry.offset_width = px;
            doc.set_geometry(id, geometry);
        })
    }

    /// Offset of the first member relative to the document: the sum of
    /// the requested axis over the offset-parent chain.
    ///
    /// The axis must be "left" or "top"; anything else is
    /// `Error::InvalidOffsetAxis`, raised before members are consulted.
    pub fn offset(&self, axis: &str) -> Result<Option<f64>, Error> {
        if axis != "left" && axis != "top" {
            return Err(Error::InvalidOffsetAxis(axis.to_string()));
        }
        let (Some(set), Some(first)) = (self.nodes(), self.first()) else {
            return Ok(None);
        };
        let doc = set.shared.doc.borrow();
        let mut total = 0.0;
        let mut node = first;
        while node.is_valid() {
            let geometry = doc.geometry(node);
            total += match axis {
                "left" => geometry.offset_left,
                _ => geometry.offset_top,
            };
            node = geometry.offset_parent;
        }
        Ok(Some(total))
    }

    /// Vertical scroll position of the first member
    pub fn scroll_top(&self) -> Option<f64> {
        let set = self.nodes()?;
        let id = self.first()?;
        Some(set.shared.doc.borrow().geometry(id).scroll_top)
    }

    /// Scroll every member to a pixel position
    pub fn set_scroll_top(&self, px: f64) -> Selection {
        self.each(|doc, id| {
            let mut geometry = doc.geometry(id);
            geometry.scroll_top = px;
            doc.set_geometry(id, geometry);
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, ElementGeometry, Quern};

    #[test]
    fn test_height_reads_geometry() {
        let q = Quern::from_html("<div></div>");
        let sel = q.select("div").unwrap();
        let id = sel.first().unwrap();
        q.document_mut()
            .set_geometry(id, ElementGeometry::at(0.0, 0.0, 300.0, 120.0));
        assert_eq!(sel.height(), Some(120.0));
        assert_eq!(sel.width(), Some(300.0));
    }

    #[test]
    fn test_set_height_writes_style_and_geometry() {
        let q = Quern::from_html("<div></div>");
        let sel = q.select("div").unwrap();
        sel.set_height(50.0);
        assert_eq!(sel.css("height").as_deref(), Some("50px"));
        assert_eq!(sel.height(), Some(50.0));
    }

    #[test]
    fn test_offset_sums_parent_chain() {
        let q = Quern::from_html("<div><span></span></div>");
        let outer = q.select("div").unwrap().first().unwrap();
        let inner = q.select("span").unwrap().first().unwrap();
        {
            let mut doc = q.document_mut();
            doc.set_geometry(outer, ElementGeometry::at(100.0, 10.0, 0.0, 0.0));
            doc.set_geometry(
                inner,
                ElementGeometry::at(5.0, 7.0, 0.0, 0.0).with_offset_parent(outer),
            );
        }
        let sel = q.select("span").unwrap();
        assert_eq!(sel.offset("left").unwrap(), Some(105.0));
        assert_eq!(sel.offset("top").unwrap(), Some(17.0));
    }

    #[test]
    fn test_offset_rejects_unknown_axis() {
        let q = Quern::from_html("<div></div>");
        let sel = q.select("div").unwrap();
        assert_eq!(
            sel.offset("right").unwrap_err(),
            Error::InvalidOffsetAxis("right".to_string())
        );
        // The axis check fires even on the empty selection.
        let empty = q.select(".missing").unwrap();
        assert!(empty.offset("right").is_err());
        assert_eq!(empty.offset("left").unwrap(), None);
    }

    #[test]
    fn test_scroll_top_round_trip() {
        let q = Quern::from_html("<div></div>");
        let sel = q.select("div").unwrap();
        assert_eq!(sel.scroll_top(), Some(0.0));
        sel.set_scroll_top(250.0);
        assert_eq!(sel.scroll_top(), Some(250.0));
    }
}
