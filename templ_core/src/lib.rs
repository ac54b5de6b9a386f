//! `templ_core` is the core library for the `templ` report generator. It
//! provides a small mustache-like template language and the metric error
//! report that is written in it.
//!
//! ## Template Syntax
//!
//! ```text
//! {{=name}}                  value, emitted verbatim
//! {{%name}}                  value, HTML-escaped
//! {{name}}..{{/name}}        rendered when `name` is truthy
//! {{name}}..{{:name}}..{{/name}}
//!                            with an else branch
//! {{!name}}..{{/!name}}      rendered when `name` is falsy
//! {{@items}}..{{/@items}}    rendered once per entry, with `_key` and `_val`
//! ```
//!
//! Names are dotted paths (`user.name.first`) resolved against a [`Context`].
//! Missing names and falsy values render as nothing; value directives still
//! render the number `0`.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template source
//!   → Lexer (logos pieces → text and directive tokens)
//!   → Parser (pairs open/else/close tags on a stack into Blocks)
//!   → Renderer (resolves names through a Scope, emits text)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Discovers and loads `templ.toml` with its data namespaces, custom report template and report defaults.
//! - [`report`]: The report template, Glean dictionary URLs and metric index handling.
//! - [`resolver`]: Dotted path resolution, loop scopes and value truthiness.
//!
//! ## Quick Start
//!
//! ```rust
//! use templ_core::Context;
//! use templ_core::Template;
//!
//! let template = Template::new("{{@items}}{{=_key}}={{=_val}};{{/@items}}");
//! let context = Context::try_from(serde_json::json!({ "items": { "a": 1, "b": 2 } })).unwrap();
//!
//! assert_eq!(template.render(&context), "a=1;b=2;");
//! ```

pub use context::*;
pub use debounce::*;
pub use error::*;
pub use escape::*;
pub use memo::*;
pub use parser::*;
pub use position::*;
pub use renderer::*;
pub use tokens::Sigil;

pub mod config;
mod context;
mod debounce;
#[allow(unused_assignments)]
mod error;
mod escape;
pub(crate) mod lexer;
mod memo;
mod parser;
mod position;
mod renderer;
pub mod report;
pub mod resolver;
pub(crate) mod tokens;

#[cfg(test)]
mod __fixtures;
