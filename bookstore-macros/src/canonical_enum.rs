use crate::utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::spanned::Spanned;
use syn::{Item, ItemEnum, LitStr, parse_macro_input};

/// #[canonical_enum] 宏实现
/// - 仅支持单元变体的枚举
/// - 变体属性 `#[label = "..."]` 指定规范标签（缺省为变体名），展开后移除该属性
/// - 为每个变体追加 `#[serde(rename = "<label>")]`，使序列化结果与标签一致
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[canonical_enum] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as Item);
    let mut en = match input {
        Item::Enum(en) => en,
        other => {
            return syn::Error::new(other.span(), "#[canonical_enum] only on enum")
                .to_compile_error()
                .into();
        }
    };

    match expand_enum(&mut en) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_enum(en: &mut ItemEnum) -> syn::Result<proc_macro2::TokenStream> {
    let mut idents = Vec::with_capacity(en.variants.len());
    let mut labels: Vec<LitStr> = Vec::with_capacity(en.variants.len());
    let mut seen = HashSet::new();

    for v in en.variants.iter_mut() {
        if !matches!(v.fields, syn::Fields::Unit) {
            return Err(syn::Error::new(
                v.span(),
                "#[canonical_enum] supports only unit variants",
            ));
        }

        let mut label: Option<LitStr> = None;
        let mut retained = Vec::with_capacity(v.attrs.len());
        for attr in v.attrs.drain(..) {
            if attr.path().is_ident("label") {
                if label.is_some() {
                    return Err(syn::Error::new(attr.span(), "duplicate #[label] on variant"));
                }
                label = Some(parse_label(&attr)?);
            } else {
                retained.push(attr);
            }
        }

        let label = label.unwrap_or_else(|| LitStr::new(&v.ident.to_string(), v.ident.span()));
        if !seen.insert(label.value()) {
            return Err(syn::Error::new(
                label.span(),
                format!("duplicate label '{}'", label.value()),
            ));
        }

        retained.push(syn::parse_quote!(#[serde(rename = #label)]));
        v.attrs = retained;
        idents.push(v.ident.clone());
        labels.push(label);
    }

    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(Copy),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    apply_derives(&mut en.attrs, required);

    let en: &ItemEnum = en;
    let ident = &en.ident;
    let (impl_generics, ty_generics, where_clause) = en.generics.split_for_impl();

    Ok(quote! {
        #en

        impl #impl_generics #ident #ty_generics #where_clause {
            /// 全部变体（声明顺序）
            pub const ALL: &'static [Self] = &[#(Self::#idents),*];

            /// 规范标签
            pub const fn label(&self) -> &'static str {
                match self {
                    #(Self::#idents => #labels,)*
                }
            }

            /// 按规范标签精确匹配
            pub fn from_label(label: &str) -> ::std::option::Option<Self> {
                match label {
                    #(#labels => ::std::option::Option::Some(Self::#idents),)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl #impl_generics ::std::fmt::Display for #ident #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.label())
            }
        }
    })
}

fn parse_label(attr: &syn::Attribute) -> syn::Result<LitStr> {
    match &attr.meta {
        syn::Meta::NameValue(nv) => match &nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) => Ok(s.clone()),
            other => Err(syn::Error::new(
                other.span(),
                "expected string literal, e.g. #[label = \"E-book\"]",
            )),
        },
        other => Err(syn::Error::new(
            other.span(),
            "expected #[label = \"...\"]",
        )),
    }
}
