//! # MLT Processor: Marker-Driven Timeline Synthesis for Shotcut Projects
//!
//! This crate reads Shotcut `.mlt` project files into a small owned element tree, pulls
//! the timeline markers out of the `shotcut:markers` block, and synthesizes new timeline
//! content from them:
//!
//! - [`synthesize_producers`]: one still-image producer per marker with a bound picture.
//! - [`synthesize_playlist`]: a playlist track of blanks and entries aligned to marker times.
//! - [`synthesize_transitions`]: blend transitions for every track pair that lacks one.
//!
//! Every pass takes the document by reference and returns a new one, so a failing pass
//! never leaves a half-edited project behind. [`run_pipeline`] chains the passes in their
//! canonical order, and [`diff_lines`] compares the before and after text for preview.
//!
//! ## ⚠️ Important: Shotcut Dialect Only
//!
//! The element tree keeps every attribute and child, but synthesis relies on Shotcut's
//! conventions (`playlist0`, the last root `<tractor>` as the main timeline, the marker
//! property names). Projects written by other MLT front ends may not have the layout the
//! passes expect.
//!
//! ## Examples
//!
//! ```rust
//! use mlt_core::{Pass, SynthesisOptions};
//! use mlt_processor::{Document, SuffixIdAllocator, extract_markers, run_pipeline};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let content = r#"<?xml version="1.0" encoding="utf-8"?>
//!     <mlt>
//!       <playlist id="playlist0"/>
//!       <tractor id="tractor0">
//!         <properties name="shotcut:markers">
//!           <properties name="0">
//!             <property name="text">Intro</property>
//!             <property name="start">00:00:05.000</property>
//!             <property name="color">#008000</property>
//!           </properties>
//!         </properties>
//!         <track producer="playlist0"/>
//!       </tractor>
//!     </mlt>"#;
//!
//!     let document = Document::parse(content)?;
//!     let mut markers = extract_markers(&document).store;
//!     assert_eq!(markers.len(), 1);
//!
//!     for marker in markers.iter_mut() {
//!         marker.picture = Some("/media/intro.png".into());
//!     }
//!
//!     let outcome = run_pipeline(
//!         &document,
//!         &markers,
//!         &SuffixIdAllocator::default(),
//!         &SynthesisOptions::default(),
//!         &[Pass::Producers, Pass::Playlist, Pass::Transitions],
//!     );
//!
//!     assert!(outcome.is_success());
//!     assert_eq!(outcome.created_ids, ["producer1", "playlist1", "transition1"]);
//!
//!     let xml = outcome.document.to_xml_string()?;
//!     assert!(xml.contains(r#"<blank length="00:00:04.517"/>"#));
//!     Ok(())
//! }
//! ```

pub mod diff;
pub mod document;
pub mod id_allocator;
pub mod markers;
pub mod parser;
pub mod serializer;
pub mod synthesis;

pub use diff::{DiffKind, DiffOp, DiffSummary, Highlight, Side, diff_lines, highlights};
pub use document::{Declaration, Document, Element, Node};
pub use id_allocator::{IdAllocator, SuffixIdAllocator, lowest_free_id, next_id};
pub use markers::{MarkerExtraction, extract_markers};
pub use parser::parse_document;
pub use serializer::serialize_document;
pub use synthesis::{
    PipelineOutcome, SynthesisOutcome, run_pass, run_pipeline, synthesize_playlist,
    synthesize_producers, synthesize_transitions,
};
