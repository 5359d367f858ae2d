#![forbid(unsafe_code)]

use quote::quote;
use syn::ItemFn;
use syn::parse_macro_input;

/// Marks a function as a `#[test]` function that also initializes the test-scoped logger
/// before running, so `log::debug!`/`log::trace!` output from solver internals is visible
/// with `--nocapture` without every test having to remember to call `test_logger()` itself.
#[proc_macro_attribute]
pub fn gpg_test(_attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let block = &input.block;
    let attrs = &input.attrs;
    let sig = &input.sig;

    let output = quote! {
        #[test]
        #(#attrs)*
        #sig {
            let __logger = gpg_utilities::test_logger();
            #block
        }
    };

    output.into()
}
