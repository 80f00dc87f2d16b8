#![forbid(unsafe_code)]

//! SVG flattening pipeline.
//!
//! Three stages, each usable on its own and composed by [`Svg`]:
//! 1. [`normalize`](normalize::normalize) — rewrite primitive shapes
//!    (`circle`, `ellipse`, `line`, `polygon`, `polyline`, `rect`) into
//!    equivalent `path` nodes;
//! 2. [`resolve_transforms`](resolve::resolve_transforms) — bake each path's
//!    `transform` attribute into its `d` coordinates;
//! 3. [`flatten`](flatten::flatten) — collapse groups and the root into a
//!    single path whose `d` concatenates all descendant path data.
//!
//! Outputs are deterministic: attribute order, coordinate formatting and
//! child order are all stable, so running a stage twice never changes the
//! result.

pub mod dom;
pub mod error;
pub mod flatten;
pub mod matrix;
pub mod normalize;
pub mod path;
pub mod resolve;
mod util;

pub use dom::{Document, Node, NodeKind};
pub use error::{Error, Result};
pub use matrix::Matrix;
pub use path::PathData;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub suppress_errors: bool,
}

impl ParseOptions {
    /// Strict parsing (errors are returned).
    pub fn strict() -> Self {
        Self {
            suppress_errors: false,
        }
    }

    /// Lenient parsing: on parse failures, carry an `<invalid/>` placeholder
    /// root through the pipeline instead of returning an error.
    pub fn lenient() -> Self {
        Self {
            suppress_errors: true,
        }
    }
}

/// Knobs shared by every pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Maximum element nesting depth a stage will recurse into.
    pub max_depth: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// A parsed SVG document plus the pipeline options, with the three stages as
/// chainable in-place operations.
///
/// ```
/// use svgflat::{ParseOptions, Svg};
///
/// let mut svg = Svg::parse(
///     r#"<svg><rect width="10" height="20"/></svg>"#,
///     ParseOptions::strict(),
/// )?;
/// svg.pathify()?.resolve_transforms()?.flatten()?;
/// assert_eq!(svg.to_svg_string(), r#"<path d="M0,0 10,0 10,20 0,20z"/>"#);
/// # Ok::<(), svgflat::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Svg {
    document: Document,
    options: PipelineOptions,
}

impl Svg {
    pub fn parse(source: &str, options: ParseOptions) -> Result<Self> {
        Ok(Self {
            document: Document::parse(source, options)?,
            options: PipelineOptions::default(),
        })
    }

    pub fn with_pipeline_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Stage 1: shapes become path nodes.
    pub fn pathify(&mut self) -> Result<&mut Self> {
        tracing::debug!("normalizing shapes to paths");
        self.rewrite_root(normalize::normalize)
    }

    /// Stage 2: `transform` attributes are baked into path data.
    pub fn resolve_transforms(&mut self) -> Result<&mut Self> {
        tracing::debug!("resolving transform attributes");
        self.rewrite_root(resolve::resolve_transforms)
    }

    /// Stage 3: the whole tree, root included, collapses into one path node
    /// carrying the root's attributes.
    pub fn flatten(&mut self) -> Result<&mut Self> {
        tracing::debug!("flattening groups");
        self.rewrite_root(flatten::flatten)
    }

    fn rewrite_root(
        &mut self,
        stage: fn(Node, &PipelineOptions) -> Result<Node>,
    ) -> Result<&mut Self> {
        let root = std::mem::replace(&mut self.document.root, Node::new(NodeKind::Svg));
        self.document.root = stage(root, &self.options)?;
        Ok(self)
    }

    pub fn root(&self) -> &Node {
        &self.document.root
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Serializes the document, preamble included.
    pub fn to_svg_string(&self) -> String {
        self.document.to_svg_string()
    }
}
