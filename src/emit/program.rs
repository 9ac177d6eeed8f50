//! Emit a whole suite file to formatted Rust source.
//!
//! ## Notes
//!
//! - The output is formatted using `prettyplease` after parsing the generated tokens with `syn`.
//! - Units are emitted in registry order (sorted by path), so regeneration is stable.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use testsync_core::StalePolicy;

use super::{EmitError, SuiteEmitter};

/// Prefix of the completeness-check function; the suite ident follows.
pub const CHECK_FN_PREFIX: &str = "test_all_files_present_in_";

impl SuiteEmitter<'_> {
    /// Emit the suite to a formatted Rust source string, header included.
    pub fn emit(&self) -> Result<String, EmitError> {
        let tokens = self.emit_tokens()?;
        let syntax_tree: syn::File = syn::parse2(tokens).map_err(|e| EmitError::SynParse(e.to_string()))?;
        let formatted = prettyplease::unparse(&syntax_tree);

        let header = format!(
            "// @generated by testsync v{} from suite '{}'. DO NOT EDIT.\n// Regenerate with `testsync generate --suite {}`.\n\n",
            crate::version::TESTSYNC_VERSION,
            self.name,
            self.name,
        );
        Ok(format!("{}{}", header, formatted))
    }

    /// Emit the suite to a TokenStream (without formatting).
    pub fn emit_tokens(&self) -> Result<TokenStream, EmitError> {
        let backend: syn::Path =
            syn::parse_str(self.backend).map_err(|_| EmitError::BadBackendPath(self.backend.to_string()))?;

        let check_fn = self.check_fn_name();
        if self.registry.iter().any(|(_, id)| id.as_str() == check_fn) {
            return Err(EmitError::NameClash(check_fn));
        }
        let check_ident = format_ident!("{}", check_fn);

        let suite_const = self.emit_suite_const();
        let units = self
            .registry
            .iter()
            .map(|(path, id)| {
                let ident = format_ident!("{}", id.as_str());
                let path = path.as_str();
                quote! {
                    #[test]
                    fn #ident() {
                        testsync::runtime::run_test(&SUITE, #path, &#backend);
                    }
                }
            })
            .collect::<Vec<_>>();

        Ok(quote! {
            #![allow(dead_code)]

            #suite_const

            #[test]
            fn #check_ident() {
                testsync::runtime::assert_all_files_present(&SUITE);
            }

            #(#units)*
        })
    }

    fn emit_suite_const(&self) -> TokenStream {
        let name = self.name;
        let root = self.root.as_str();
        let pattern = self.spec.pattern.as_str();
        let exclude = self.spec.exclusions.paths().map(|p| p.as_str()).collect::<Vec<_>>();
        let exclude_pattern = match self.spec.exclusions.pattern() {
            Some(p) => {
                let p = p.as_str();
                quote! { Some(#p) }
            }
            None => quote! { None },
        };
        let recursive = self.spec.recursive;
        let stale = match self.stale {
            StalePolicy::Fail => quote! { testsync::runtime::StalePolicy::Fail },
            StalePolicy::Ignore => quote! { testsync::runtime::StalePolicy::Ignore },
        };
        let entries = self.registry.iter().map(|(path, id)| {
            let path = path.as_str();
            let id = id.as_str();
            quote! { (#path, #id) }
        });

        quote! {
            pub const SUITE: testsync::runtime::SuiteDefinition = testsync::runtime::SuiteDefinition {
                name: #name,
                manifest_dir: env!("CARGO_MANIFEST_DIR"),
                root: #root,
                pattern: #pattern,
                exclude: &[#(#exclude),*],
                exclude_pattern: #exclude_pattern,
                recursive: #recursive,
                stale: #stale,
                entries: &[#(#entries),*],
            };
        }
    }
}
