//! Inserts the page-number shape into a slide part.
//!
//! The slide XML is treated as opaque text: the shape fragment is spliced
//! in front of a closing tag and every other byte is left as it was.

use pagenum_core::{InsertionPoint, ShapeStyle, SlideMutationError};
use quick_xml::escape::escape;

/// Closing tag of the shape tree.
pub const SHAPE_TREE_CLOSE: &str = "</p:spTree>";

/// Closing tag of the slide content, used when there is no shape tree.
pub const SLIDE_CONTENT_CLOSE: &str = "</p:cSld>";

/// Renders page-number shapes and splices them into slide XML.
#[derive(Debug, Clone, Default)]
pub struct SlideMutator {
    style: ShapeStyle,
}

impl SlideMutator {
    /// Create a mutator with the default shape style.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: ShapeStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    /// Return `xml` with a page-number shape for `slide_index` inserted.
    pub fn mutate(&self, xml: &str, slide_index: usize) -> Result<String, SlideMutationError> {
        self.insert(xml, slide_index).map(|(xml, _)| xml)
    }

    /// Like [`mutate`](Self::mutate), also reporting where the shape went.
    pub fn insert(
        &self,
        xml: &str,
        slide_index: usize,
    ) -> Result<(String, InsertionPoint), SlideMutationError> {
        let (point, at) = find_insertion_point(xml).ok_or(SlideMutationError::MissingInsertionPoint)?;
        let fragment = self.shape_fragment(slide_index);

        let mut out = String::with_capacity(xml.len() + fragment.len());
        out.push_str(&xml[..at]);
        out.push_str(&fragment);
        out.push_str(&xml[at..]);

        Ok((out, point))
    }

    /// The `p:sp` element showing `slide_index`.
    pub fn shape_fragment(&self, slide_index: usize) -> String {
        let s = &self.style;
        format!(
            r#"<p:sp>
    <p:nvSpPr>
        <p:cNvPr id="{id}" name="SlideNumber{index}"/>
        <p:cNvSpPr/>
        <p:nvPr/>
    </p:nvSpPr>
    <p:spPr>
        <a:xfrm>
            <a:off x="{x}" y="{y}"/>
            <a:ext cx="{cx}" cy="{cy}"/>
        </a:xfrm>
        <a:prstGeom prst="rect">
            <a:avLst/>
        </a:prstGeom>
    </p:spPr>
    <p:txBody>
        <a:bodyPr wrap="none" rtlCol="0"/>
        <a:lstStyle/>
        <a:p>
            <a:pPr algn="{algn}"/>
            <a:r>
                <a:rPr lang="{lang}" sz="{sz}" b="{b}">
                    <a:solidFill>
                        <a:srgbClr val="{color}"/>
                    </a:solidFill>
                    <a:latin typeface="{typeface}"/>
                </a:rPr>
                <a:t>{index}</a:t>
            </a:r>
        </a:p>
    </p:txBody>
</p:sp>"#,
            id = s.shape_id(slide_index),
            index = slide_index,
            x = s.x,
            y = s.y,
            cx = s.cx,
            cy = s.cy,
            algn = escape(&s.alignment),
            lang = escape(&s.lang),
            sz = s.font_size,
            b = if s.bold { 1 } else { 0 },
            color = escape(&s.color),
            typeface = escape(&s.typeface),
        )
    }
}

/// Byte offset the shape goes at: before the last `</p:spTree>`, else
/// before the last `</p:cSld>`.
pub fn find_insertion_point(xml: &str) -> Option<(InsertionPoint, usize)> {
    if let Some(at) = xml.rfind(SHAPE_TREE_CLOSE) {
        return Some((InsertionPoint::ShapeTree, at));
    }
    xml.rfind(SLIDE_CONTENT_CLOSE)
        .map(|at| (InsertionPoint::SlideContent, at))
}
