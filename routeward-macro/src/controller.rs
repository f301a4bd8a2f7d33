use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Attribute, FnArg,
    ImplItem, ItemImpl, ItemStruct, LitStr, Token,
};

const ROUTE_ATTRS: [&str; 6] = ["get", "post", "put", "delete", "patch", "route"];
const PARAM_ATTRS: [&str; 4] = ["body", "form", "param", "query"];

/// Verb, `HttpMethod` variant, `MethodFilter` constant.
const METHODS: [(&str, &str, &str); 7] = [
    ("GET", "Get", "GET"),
    ("POST", "Post", "POST"),
    ("PUT", "Put", "PUT"),
    ("PATCH", "Patch", "PATCH"),
    ("DELETE", "Delete", "DELETE"),
    ("HEAD", "Head", "HEAD"),
    ("OPTIONS", "Options", "OPTIONS"),
];

struct ControllerArgs {
    path: String,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut path = None;
        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if name == "path" {
                let lit: LitStr = input.parse()?;
                path = Some(lit.value());
            } else {
                return Err(syn::Error::new(
                    name.span(),
                    format!("unknown controller argument `{}`", name),
                ));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(ControllerArgs {
            path: path.unwrap_or_else(|| "/".to_string()),
        })
    }
}

pub fn controller_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ControllerArgs);
    let input = parse_macro_input!(item as ItemStruct);
    let expanded = generate_controller_impl(&args, &input);
    TokenStream::from(expanded)
}

fn generate_controller_impl(args: &ControllerArgs, input: &ItemStruct) -> TokenStream2 {
    let struct_name = &input.ident;
    let base_path = &args.path;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    quote! {
        #input

        impl #impl_generics #struct_name #ty_generics #where_clause {
            pub fn base_path() -> &'static str { #base_path }
        }
    }
}

/// `path`, optional `name = "..."`, and for `#[route]` optional `methods = [..]`.
struct RouteArgs {
    path: LitStr,
    name: Option<LitStr>,
    methods: Option<Vec<syn::Ident>>,
}

impl Parse for RouteArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let path: LitStr = input.parse()?;
        let mut name = None;
        let mut methods = None;

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let key: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if key == "name" {
                name = Some(input.parse::<LitStr>()?);
            } else if key == "methods" {
                let content;
                syn::bracketed!(content in input);
                let list = Punctuated::<syn::Ident, Token![,]>::parse_terminated(&content)?;
                methods = Some(list.into_iter().collect());
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    format!("unknown route argument `{}`", key),
                ));
            }
        }

        Ok(RouteArgs {
            path,
            name,
            methods,
        })
    }
}

#[derive(Clone, Copy)]
enum ParamKind {
    Body,
    Form,
    Param,
    Query,
    Raw,
}

struct ParamInfo {
    ty: syn::Type,
    kind: ParamKind,
}

struct MethodSpec {
    variant: syn::Ident,
    filter: syn::Ident,
}

struct RouteInfo {
    name: String,
    path: String,
    methods: Vec<MethodSpec>,
    fn_name: syn::Ident,
    params: Vec<ParamInfo>,
}

pub fn routes_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    let expanded = generate_routes_impl(input).unwrap_or_else(syn::Error::into_compile_error);
    TokenStream::from(expanded)
}

fn generate_routes_impl(input: ItemImpl) -> syn::Result<TokenStream2> {
    let mut routes: Vec<RouteInfo> = Vec::new();
    let mut clean_items: Vec<ImplItem> = Vec::new();
    let mut errors: Option<syn::Error> = None;

    for item in input.items.iter() {
        let ImplItem::Fn(method) = item else {
            clean_items.push(item.clone());
            continue;
        };

        match extract_route_info(method) {
            Ok(Some(route_info)) => {
                routes.push(route_info);
                let mut clean_method = method.clone();
                clean_method.attrs.retain(|attr| !is_route_attr(attr));
                for input in clean_method.sig.inputs.iter_mut() {
                    if let FnArg::Typed(pat_type) = input {
                        pat_type.attrs.retain(|attr| !is_param_attr(attr));
                    }
                }
                clean_items.push(ImplItem::Fn(clean_method));
            }
            Ok(None) => clean_items.push(item.clone()),
            Err(e) => match errors.as_mut() {
                Some(errors) => errors.combine(e),
                None => errors = Some(e),
            },
        }
    }

    if let Some(errors) = errors {
        return Err(errors);
    }

    let route_registrations = routes.iter().map(|route| {
        let path = &route.path;
        let fn_name = &route.fn_name;

        let extractor_patterns: Vec<_> = route
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let temp_ident = format_ident!("__p_{}", i);
                let ty = &p.ty;
                match p.kind {
                    ParamKind::Body => {
                        quote! { ::routeward::axum::Json(#temp_ident): ::routeward::axum::Json<#ty> }
                    }
                    ParamKind::Form => {
                        quote! { ::routeward::axum::Form(#temp_ident): ::routeward::axum::Form<#ty> }
                    }
                    ParamKind::Param => {
                        quote! { ::routeward::axum::extract::Path(#temp_ident): ::routeward::axum::extract::Path<#ty> }
                    }
                    ParamKind::Query => {
                        quote! { ::routeward::axum::extract::Query(#temp_ident): ::routeward::axum::extract::Query<#ty> }
                    }
                    ParamKind::Raw => quote! { #temp_ident: #ty },
                }
            })
            .collect();

        let internal_args: Vec<_> = (0..route.params.len())
            .map(|i| format_ident!("__p_{}", i))
            .collect();

        let handler = quote! {{
            let controller = controller.clone();
            move |#(#extractor_patterns),*| {
                let controller = controller.clone();
                async move {
                    use ::routeward::axum::response::IntoResponse;
                    controller.#fn_name(#(#internal_args),*).await.into_response()
                }
            }
        }};

        let method_router = match route.methods.split_first() {
            None => quote! { ::routeward::axum::routing::any(#handler) },
            Some((first, rest)) => {
                let first = &first.filter;
                let rest = rest.iter().map(|m| &m.filter);
                quote! {
                    ::routeward::axum::routing::on(
                        ::routeward::axum::routing::MethodFilter::#first
                            #(.or(::routeward::axum::routing::MethodFilter::#rest))*,
                        #handler,
                    )
                }
            }
        };

        quote! {
            .route(
                &::routeward::routing::join_path(Self::base_path(), #path),
                #method_router,
            )
        }
    });

    let descriptors = routes.iter().map(|route| {
        let name = &route.name;
        let path = &route.path;
        let variants = route.methods.iter().map(|m| {
            let variant = &m.variant;
            quote! { ::routeward::routing::HttpMethod::#variant }
        });
        quote! {
            ::routeward::routing::RouteDescriptor::new(
                #name,
                ::routeward::routing::join_path(Self::base_path(), #path),
                ::std::vec![#(#variants),*],
            )
        }
    });

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #self_ty #where_clause {
            #(#clean_items)*

            #[allow(unused_variables)]
            pub fn router<S>(controller: ::std::sync::Arc<Self>) -> ::routeward::axum::Router<S>
            where
                S: Clone + Send + Sync + 'static,
            {
                ::routeward::axum::Router::new() #(#route_registrations)*
            }
        }

        impl #impl_generics ::routeward::controller::Controller for #self_ty #where_clause {
            fn identifier() -> &'static str {
                ::core::module_path!()
            }

            fn routes() -> ::std::vec::Vec<::routeward::routing::RouteDescriptor> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

fn extract_route_info(method: &syn::ImplItemFn) -> syn::Result<Option<RouteInfo>> {
    let mut route_attr: Option<(String, &Attribute)> = None;

    for attr in &method.attrs {
        if let Some(ident) = attr.path().get_ident() {
            let name = ident.to_string();
            if ROUTE_ATTRS.contains(&name.as_str()) {
                if route_attr.is_some() {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "a handler can only carry one route attribute",
                    ));
                }
                route_attr = Some((name, attr));
            }
        }
    }

    let Some((kind, attr)) = route_attr else {
        return Ok(None);
    };
    let args: RouteArgs = attr.parse_args()?;

    let verbs = if kind == "route" {
        args.methods.unwrap_or_default()
    } else if args.methods.is_some() {
        return Err(syn::Error::new_spanned(
            attr,
            "`methods` is only allowed on #[route]",
        ));
    } else {
        vec![syn::Ident::new(&kind.to_uppercase(), args.path.span())]
    };
    let methods = verbs
        .iter()
        .map(method_spec)
        .collect::<syn::Result<Vec<_>>>()?;

    let name = args
        .name
        .map(|name| name.value())
        .unwrap_or_else(|| method.sig.ident.to_string());

    let mut params = Vec::new();
    for input in method.sig.inputs.iter() {
        if let FnArg::Typed(pat_type) = input {
            let ty = (*pat_type.ty).clone();
            let kind = get_param_kind(&pat_type.attrs);
            params.push(ParamInfo { ty, kind });
        }
    }

    Ok(Some(RouteInfo {
        name,
        path: args.path.value(),
        methods,
        fn_name: method.sig.ident.clone(),
        params,
    }))
}

fn method_spec(verb: &syn::Ident) -> syn::Result<MethodSpec> {
    let upper = verb.to_string().to_uppercase();
    METHODS
        .iter()
        .find(|(name, _, _)| *name == upper)
        .map(|(_, variant, filter)| MethodSpec {
            variant: format_ident!("{}", variant),
            filter: format_ident!("{}", filter),
        })
        .ok_or_else(|| {
            syn::Error::new_spanned(verb, format!("unsupported HTTP method `{}`", verb))
        })
}

fn get_param_kind(attrs: &[Attribute]) -> ParamKind {
    for attr in attrs {
        if let Some(ident) = attr.path().get_ident() {
            match ident.to_string().as_str() {
                "body" => return ParamKind::Body,
                "form" => return ParamKind::Form,
                "param" => return ParamKind::Param,
                "query" => return ParamKind::Query,
                _ => {}
            }
        }
    }
    ParamKind::Raw
}

fn is_route_attr(attr: &Attribute) -> bool {
    attr.path()
        .get_ident()
        .is_some_and(|ident| ROUTE_ATTRS.contains(&ident.to_string().as_str()))
}

fn is_param_attr(attr: &Attribute) -> bool {
    attr.path()
        .get_ident()
        .is_some_and(|ident| PARAM_ATTRS.contains(&ident.to_string().as_str()))
}
