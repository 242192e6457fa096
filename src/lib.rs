//! Declaration graph and dependency resolver for emitting a C++ header
//! library from an opaque source-IDL symbol/type API.
//!
//! This crate is the emission *core*: a frontend builds up a
//! [`decl::builder::Library`] by declaring classes, functions, variables,
//! and aliases and linking them together through an intern-backed
//! expression algebra ([`expr`]), then calls [`Library::emit`] with a
//! [`sink::Writer`] sink to run the resolver and produce header text.
//! Frontend AST construction, symbol resolution, output byte-level
//! formatting policy, and CLI flag parsing all stay outside this crate.
//!
//! # Example
//!
//! ```ignore
//! use cxxiface::decl::builder::Library;
//! use cxxiface::decl::{ClassDecl, Parent};
//! use cxxiface::options::Options;
//! use cxxiface::sink::StringWriter;
//!
//! let mut lib = Library::new(Options::default());
//! let foo = lib.declare_class("Foo", None, ClassDecl::default());
//!
//! let mut out = StringWriter::new(true);
//! lib.emit(&[foo], "FOO_H", &mut out)?;
//! println!("{}", out.into_string());
//! # Ok::<(), cxxiface::error::EmitError>(())
//! ```
//!
//! # Module map
//!
//! - [`ids`] — stable arena identifiers.
//! - [`state`] — the `Partial`/`Complete` completion lattice.
//! - [`expr`] — the interned expression/type algebra.
//! - [`decl`] — the declaration graph, namespace paths, and the
//!   frontend-facing construction API ([`decl::builder`]).
//! - [`reference`] — decides which inner declarations must be emitted
//!   complete within their enclosing class.
//! - [`resolver`] — drives declarations to the state their targets need,
//!   detecting unresolvable cycles.
//! - [`class_planner`] — lays out a completed class's body.
//! - [`passes`] — global passes that run before the resolver: dedup,
//!   virtual-base marking, using-declaration insertion.
//! - [`writer`] — top-level emission, tying the above together.
//! - [`sink`] — the `Writer` trait output passes through.
//! - [`options`] — ambient, constructible-without-a-CLI emission config.
//! - [`error`] — the public error taxonomy.

pub mod class_planner;
pub mod decl;
pub mod error;
pub mod expr;
pub mod ids;
pub mod options;
pub mod passes;
pub mod reference;
pub mod resolver;
pub mod sink;
pub mod state;
pub mod writer;

pub use decl::builder::Library;
pub use error::{CycleError, EmitError};
pub use options::Options;
