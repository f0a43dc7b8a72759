/// objview terminal - view and edit OBJ models as ASCII wireframes
///
/// Usage: objview-terminal [model.obj ...]
///
/// With no readable model a cube is shown. Set RUST_LOG for diagnostics.
use objview_core::Model;
use objview_terminal::{Document, TerminalApp, ViewerSettings};
use std::env;
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();

    let mut documents = Vec::new();
    for path in env::args().skip(1) {
        match Document::open(&path) {
            Ok(doc) => documents.push(doc),
            Err(e) => eprintln!("Failed to load {}: {}", path, e),
        }
    }

    if documents.is_empty() {
        println!("No model loaded, using default cube...");
        documents.push(Document::new("cube", Model::cube(2.0)));
    }

    let mut app = TerminalApp::new(documents, ViewerSettings::default())?;
    app.run()
}
