//! Helpers for building and reading packages in tests.

use pagenum_core::ProgressListener;
use std::cell::RefCell;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Builds an in-memory ZIP archive entry by entry.
pub struct ZipBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Add a deflated file.
    pub fn file(self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.add(name, data.as_ref(), CompressionMethod::Deflated)
    }

    /// Add a stored file.
    pub fn stored(self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.add(name, data.as_ref(), CompressionMethod::Stored)
    }

    pub fn dir(mut self, name: &str) -> Self {
        self.writer.add_directory(name, FileOptions::default()).unwrap();
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }

    fn add(mut self, name: &str, data: &[u8], method: CompressionMethod) -> Self {
        let options = FileOptions::default().compression_method(method);
        self.writer.start_file(name, options).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }
}

/// Name and decompressed bytes of every entry, in archive order.
pub fn read_zip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}

/// Decompressed bytes of one entry.
pub fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    read_zip(bytes)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, data)| data)
        .unwrap_or_else(|| panic!("no entry named {}", name))
}

/// A minimal slide part with an empty shape tree.
pub fn slide_xml(title: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
            "<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>",
            "<p:grpSpPr/>",
            "<p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"Title 1\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>",
            "<p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>",
            "</p:spTree></p:cSld></p:sld>"
        ),
        title
    )
}

/// A presentation with the given slide file names under `ppt/slides/`.
pub fn presentation(slide_names: &[&str]) -> Vec<u8> {
    let mut builder = ZipBuilder::new()
        .file("[Content_Types].xml", r#"<?xml version="1.0"?><Types/>"#)
        .file("_rels/.rels", r#"<?xml version="1.0"?><Relationships/>"#)
        .file("ppt/presentation.xml", r#"<?xml version="1.0"?><p:presentation/>"#)
        .stored("ppt/media/image1.png", [0x89u8, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
        .dir("ppt/slides/");
    for name in slide_names {
        builder = builder
            .file(&format!("ppt/slides/{}", name), slide_xml(name))
            .file(
                &format!("ppt/slides/_rels/{}.rels", name),
                r#"<?xml version="1.0"?><Relationships/>"#,
            );
    }
    builder.finish()
}

/// The text runs of every `p:sp` whose `p:cNvPr` name starts with `SlideNumber`.
pub fn page_number_shapes(xml: &str) -> Vec<(String, String)> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut shapes = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().unwrap() {
            Event::Empty(e) if e.name().as_ref() == b"p:cNvPr" => {
                let id = e.try_get_attribute("id").unwrap().unwrap().unescape_value().unwrap().to_string();
                let name = e.try_get_attribute("name").unwrap().unwrap().unescape_value().unwrap().to_string();
                if name.starts_with("SlideNumber") {
                    current = Some((id, String::new()));
                }
            }
            Event::Start(e) if e.name().as_ref() == b"a:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"a:t" => in_text = false,
            Event::Text(t) if in_text => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&t.unescape().unwrap());
                }
            }
            Event::End(e) if e.name().as_ref() == b"p:sp" => {
                if let Some(shape) = current.take() {
                    shapes.push(shape);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    shapes
}

/// Records every notification.
#[derive(Default)]
pub struct RecordingListener {
    pub progress: RefCell<Vec<(u8, String)>>,
    pub completions: RefCell<Vec<(bool, String)>>,
}

impl ProgressListener for RecordingListener {
    fn on_progress(&self, percent: u8, message: &str) {
        self.progress.borrow_mut().push((percent, message.to_string()));
    }

    fn on_complete(&self, success: bool, message: &str) {
        self.completions.borrow_mut().push((success, message.to_string()));
    }
}
