//! WASM-compatible wrapper for adding page numbers to PPTX files.
//!
//! This crate exposes the numbering pipeline to JavaScript for use in
//! Cloudflare Workers. Everything is staged in memory.

use pagenum_core::{
    NumberingOptions, ProcessingOutcome, ProgressListener, ShapeStyle, SlidePart, StagingMode,
};
use pagenum_pptx::{archive, locate, MemoryInput, MemorySink, SlideNumberer};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// One slide part and the number it gets.
#[derive(Debug, Serialize, Deserialize)]
pub struct SlideInfo {
    pub path: String,
    pub index: usize,
}

impl From<SlidePart> for SlideInfo {
    fn from(slide: SlidePart) -> Self {
        Self {
            path: slide.path,
            index: slide.index,
        }
    }
}

/// Add a page number to every slide of a PPTX file.
///
/// # Arguments
/// * `data` - The raw bytes of the PPTX file
/// * `style` - Optional shape style object; missing fields use defaults
/// * `on_progress` - Optional `(percent, message) => void` callback
///
/// # Returns
/// The bytes of the numbered presentation, or throws the failure message.
#[wasm_bindgen]
pub fn add_slide_numbers(
    data: &[u8],
    style: JsValue,
    on_progress: Option<js_sys::Function>,
) -> Result<Vec<u8>, JsValue> {
    let style: ShapeStyle = if style.is_undefined() || style.is_null() {
        ShapeStyle::default()
    } else {
        serde_wasm_bindgen::from_value(style)
            .map_err(|e| JsValue::from_str(&format!("Invalid style: {}", e)))?
    };

    let listener = JsProgress { callback: on_progress };
    add_slide_numbers_impl(data, style, &listener).map_err(|e| JsValue::from_str(&e))
}

/// List the slide parts of a PPTX file and the numbers they would get.
#[wasm_bindgen]
pub fn list_slides(data: &[u8]) -> Result<JsValue, JsValue> {
    let slides = list_slides_impl(data).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&slides)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn add_slide_numbers_impl(
    data: &[u8],
    style: ShapeStyle,
    listener: &dyn ProgressListener,
) -> Result<Vec<u8>, String> {
    let options = NumberingOptions::new()
        .with_style(style)
        .with_staging(StagingMode::Memory);

    let sink = MemorySink::new();
    let outcome = SlideNumberer::with_options(options).process(
        &MemoryInput::new(data.to_vec()),
        &sink,
        listener,
    );

    match outcome {
        ProcessingOutcome::Completed { .. } => Ok(sink.contents()),
        ProcessingOutcome::Failed { message } => Err(message),
    }
}

fn list_slides_impl(data: &[u8]) -> Result<Vec<SlideInfo>, String> {
    let package = archive::extract(Cursor::new(data)).map_err(|e| e.to_string())?;

    Ok(locate(&package).into_iter().map(SlideInfo::from).collect())
}

/// Forwards progress to an optional JavaScript callback.
struct JsProgress {
    callback: Option<js_sys::Function>,
}

impl ProgressListener for JsProgress {
    fn on_progress(&self, percent: u8, message: &str) {
        if let Some(callback) = &self.callback {
            if let Err(thrown) = callback.call2(
                &JsValue::NULL,
                &JsValue::from(percent),
                &JsValue::from_str(message),
            ) {
                log::warn!("Progress callback threw at {}%: {:?}", percent, thrown);
            }
        }
    }

    // Completion is the return value of `add_slide_numbers`.
    fn on_complete(&self, _success: bool, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagenum_core::NoopListener;
    use std::io::{Read, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    pub(super) fn deck() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        for name in ["ppt/slides/slide2.xml", "ppt/slides/slide1.xml"] {
            writer.start_file(name, options).unwrap();
            writer
                .write_all(b"<p:sld><p:cSld><p:spTree></p:spTree></p:cSld></p:sld>")
                .unwrap();
        }
        writer.start_file("ppt/presentation.xml", options).unwrap();
        writer.write_all(b"<p:presentation/>").unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_add_slide_numbers() {
        let output = add_slide_numbers_impl(&deck(), ShapeStyle::default(), &NoopListener).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(output)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide2.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        assert!(xml.contains(r#"<p:cNvPr id="1002" name="SlideNumber2"/>"#));
        assert!(xml.contains("<a:t>2</a:t>"));
    }

    #[test]
    fn test_add_slide_numbers_rejects_garbage() {
        let err = add_slide_numbers_impl(b"nope", ShapeStyle::default(), &NoopListener).unwrap_err();
        assert!(err.starts_with("Error: "));
    }

    #[test]
    fn test_list_slides() {
        let slides = list_slides_impl(&deck()).unwrap();

        let listed: Vec<_> = slides.iter().map(|s| (s.path.as_str(), s.index)).collect();
        assert_eq!(
            listed,
            vec![("ppt/slides/slide1.xml", 1), ("ppt/slides/slide2.xml", 2)]
        );
    }
}
