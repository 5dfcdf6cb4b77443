//! Apidoc Core - API documentation engine for PHP projects
//!
//! This crate provides the core functionality:
//! - Lexer and parser: declarations of PHP source files
//! - Annotation parser: docblocks and PHPStan-style type expressions
//! - Reflection: class-likes with their inherited and imported members
//! - Resolver: annotation and native types to linked type references
//! - Descriptors: lazily computed structure and member facts
//! - Renderer and generator: HTML pages for a whole project

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of PHP source code
pub mod lexer;

/// Abstract Syntax Tree - declarations of a PHP file
pub mod ast;

/// Parser module - converts tokens into declarations
pub mod parser;

/// Docblock parsing - tags and type expressions
pub mod phpdoc;

/// Resolved type references
pub mod types;

/// Class registry and static reflection
pub mod reflect;

/// Run-wide symbol table of structure descriptors
pub mod symbols;

/// Run context shared by descriptors
pub mod context;

/// Type reference resolver
pub mod resolver;

/// Structure and member descriptors
pub mod structure;

/// Link resolution for structure pages
pub mod url;

/// Namespace tree of documented structures
pub mod tree;

/// Project configuration (`apidoc.toml`)
pub mod config;

/// HTML rendering
pub mod render;

/// Documentation runs over a project directory
pub mod generator;

/// Text helpers - natural ordering, kebab case, escaping
pub mod util;

/// Test utilities - in-memory projects
pub mod testutil;

/// Convenience re-export of the parser
pub use parser::Parser;

/// Convenience re-export of the annotation parser
pub use phpdoc::{CommentParser, PhpDoc};

/// Convenience re-export of the run context
pub use context::DocContext;

/// Convenience re-export of descriptors
pub use structure::{MethodInfo, StructureInfo};

/// Convenience re-export of type references
pub use types::VarType;

/// Convenience re-export of configuration
pub use config::DocConfig;

/// Convenience re-export of the generator
pub use generator::{GenerateReport, Generator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
