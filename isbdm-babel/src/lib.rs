//! ISBDM site conversion: HTML pages to Docusaurus MDX
//!
//!     This crate holds the two halves of the conversion of the ISBDM HTML site into MDX, plus the
//!     element tree and identifier helpers both halves share.
//!
//!     - Sidebar hierarchy: the source pages render each section's sidebar as a flat list of rows
//!       where the only hierarchy signal is an indent icon count. We rebuild a strict tree from it
//!       (depth, position, last-sibling and ancestor flags, box-drawing prefix) and write the
//!       result into the front matter of the matching target documents.
//!     - Transpiler: walks one source page and re-emits it as MDX, keeping the block nesting of
//!       definitions, stipulations, example tables and cross-reference callouts, with fixed
//!       blank-line rules.
//!
//!     This is a pure lib, that is, it powers isbdm-cli but is shell agnostic: no code should suppose
//!     a shell environment, be it std print, env vars or process exit. Source pages are reached
//!     through the SourceLoader trait.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── dom.rs                  # html5ever element tree adapter, Query / Selector
//!     ├── text.rs                 # text and document key normalization
//!     ├── nav
//!     │   ├── mod.rs              # sidebar row parsing, NavEntry
//!     │   ├── hierarchy.rs        # flat rows -> tree flags
//!     │   ├── prefix.rs           # box-drawing prefixes
//!     │   ├── section.rs          # multi-source sections, SourceLoader
//!     │   ├── cache.rs            # SectionCache and document lookup
//!     │   └── metadata.rs         # sidebar front-matter keys
//!     ├── transpile
//!     │   ├── mod.rs              # document walk, diagnostics
//!     │   ├── classify.rs         # Block classification
//!     │   ├── inline.rs           # inline fragment rewriting
//!     │   ├── reference.rs        # element reference metadata and header
//!     │   └── stipulation.rs      # stipulation blocks and example tables
//!     ├── frontmatter.rs          # YAML front matter split / render
//!     └── assemble.rs             # output line cleaning
//!
//! Testing
//!     tests
//!     ├── nav
//!     ├── transpile
//!     └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     The hierarchy reconstruction (./nav/hierarchy.rs) and the stipulation block rendering
//!     (./transpile/stipulation.rs) carry most of the logic. Everything else is lookups and
//!     string shaping around them.
//!
pub mod assemble;
pub mod dom;
pub mod error;
pub mod frontmatter;
pub mod nav;
pub mod text;
pub mod transpile;

pub use assemble::assemble;
pub use error::BabelError;
pub use nav::{
    apply_sidebar_metadata, build_section, reconstruct, render_prefix, DirectoryLoader,
    MemoryLoader, NavEntry, RawNavEntry, SectionCache, SectionSpec, SidebarMatch,
    SidebarMetadata, SourceLoader,
};
pub use transpile::{transpile, DocumentContext, Transpiled, TranspileOptions};
