use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

pub fn http_method_attribute(method: &str, _attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as syn::ImplItemFn);

    // Route attributes only mean something inside a #[routes] impl block,
    // which strips them before they expand.
    let message = format!(
        "#[{}] must be used inside an impl block annotated with #[routes]",
        method.to_lowercase()
    );
    let error = syn::Error::new_spanned(&input.sig.ident, message).to_compile_error();

    TokenStream::from(quote! {
        #error
        #input
    })
}
