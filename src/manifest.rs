//! Read the registry back out of a generated suite file.
//!
//! The generated file is the only place a registry is persisted: `SUITE.entries` holds the
//! `(path, unit id)` pairs. `testsync check` and `testsync run` parse that file with `syn` instead of
//! regenerating, so they work on what is actually committed.

use std::fs;
use std::path::{Path, PathBuf};

use syn::{Expr, ExprLit, Item, Lit};
use thiserror::Error;

use testsync_core::{Registry, RegistryError};

/// Name of the constant the emitter writes.
pub const SUITE_CONST: &str = "SUITE";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read generated suite '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("generated suite is not valid Rust: {0}")]
    Syntax(#[from] syn::Error),

    #[error("generated suite has no `SUITE` constant")]
    MissingSuite,

    #[error("`SUITE.entries` is malformed: {0}")]
    Malformed(&'static str),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Parse generated source and return its registry.
pub fn read_registry(source: &str) -> Result<Registry, ManifestError> {
    let file = syn::parse_file(source)?;
    let entries = file
        .items
        .iter()
        .find_map(|item| match item {
            Item::Const(c) if c.ident == SUITE_CONST => Some(&*c.expr),
            _ => None,
        })
        .ok_or(ManifestError::MissingSuite)
        .and_then(entries_field)?;

    let pairs = entries
        .iter()
        .map(|elem| match elem {
            Expr::Tuple(t) if t.elems.len() == 2 => Ok((str_lit(&t.elems[0])?, str_lit(&t.elems[1])?)),
            _ => Err(ManifestError::Malformed("expected (path, unit) tuples")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Registry::from_pairs(pairs.iter().map(|(p, id)| (p.as_str(), id.as_str())))?)
}

/// [`read_registry`] for a file on disk.
pub fn read_registry_file(path: &Path) -> Result<Registry, ManifestError> {
    let source = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_registry(&source)
}

fn entries_field(expr: &Expr) -> Result<Vec<&Expr>, ManifestError> {
    let Expr::Struct(init) = expr else {
        return Err(ManifestError::Malformed("SUITE is not a struct literal"));
    };
    let field = init
        .fields
        .iter()
        .find(|f| matches!(&f.member, syn::Member::Named(ident) if ident == "entries"))
        .ok_or(ManifestError::Malformed("no `entries` field"))?;

    let array = match &field.expr {
        Expr::Reference(r) => &*r.expr,
        other => other,
    };
    match array {
        Expr::Array(a) => Ok(a.elems.iter().collect()),
        _ => Err(ManifestError::Malformed("`entries` is not an array")),
    }
}

fn str_lit(expr: &Expr) -> Result<String, ManifestError> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Ok(s.value()),
        _ => Err(ManifestError::Malformed("expected a string literal")),
    }
}
