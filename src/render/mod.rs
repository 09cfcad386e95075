//! Composite rendering: collages, framed cards, printable documents and
//! photo booth composites.

pub mod booth;
pub mod collage;
pub mod document;
pub mod draw;
pub mod error;
pub mod frame;
pub mod text;
