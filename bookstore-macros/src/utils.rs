use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::parse::Parser;
use syn::spanned::Spanned;
use syn::{Attribute, Field, FieldsNamed, Token, Type, punctuated::Punctuated};

// 提取非 derive 属性与已有 derive 列表
pub(crate) fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs.iter() {
        if attr.path().is_ident("derive") {
            if let Ok(list) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, Token![,]>::parse_terminated,
            ) {
                existing.extend(list);
            }
        } else {
            retained.push(attr.clone());
        }
    }
    (retained, existing)
}

// 合并默认与已有 derive（去重，优先保留 required）
pub(crate) fn merge_derives(existing: Vec<syn::Path>, required: Vec<syn::Path>) -> Attribute {
    let mut seen = std::collections::HashSet::<String>::new();
    let final_list: Vec<syn::Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();
    syn::parse_quote!(#[derive(#(#final_list),*)])
}

// 归一化 derive 的 key，避免 Serialize/serde::Serialize 重复
pub(crate) fn derive_key(p: &syn::Path) -> String {
    match p.segments.last() {
        Some(last) => {
            let last_ident = last.ident.to_string();
            match last_ident.as_str() {
                "Serialize" | "Deserialize" => format!("serde::{}", last_ident),
                _ => last_ident,
            }
        }
        None => p.to_token_stream().to_string(),
    }
}

// 直接在 attrs 上应用默认派生合并
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let (retained, existing) = split_derives(attrs);
    let merged = merge_derives(existing, required);
    *attrs = std::iter::once(merged).chain(retained).collect();
}

/// 解析形如 `key = true|false` 的单一布尔参数；参数为空时返回 `None`
pub(crate) fn parse_bool_flag(tokens: TokenStream2, key: &str) -> syn::Result<Option<bool>> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let assigns =
        Punctuated::<syn::MetaNameValue, Token![,]>::parse_terminated.parse2(tokens)?;

    let mut value: Option<bool> = None;
    for nv in assigns {
        if !nv.path.is_ident(key) {
            return Err(syn::Error::new(
                nv.path.span(),
                format!("unknown key in attribute; expected '{key}'"),
            ));
        }
        if value.is_some() {
            return Err(syn::Error::new(
                nv.path.span(),
                format!("duplicate key '{key}' in attribute"),
            ));
        }
        match nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Bool(b),
                ..
            }) => value = Some(b.value()),
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    format!("expected boolean literal for '{key}'"),
                ));
            }
        }
    }
    Ok(value)
}

/// 确保具名字段结构体包含所需字段
/// - required: (字段名, 字段类型) 列表，按给定顺序处理
/// - reposition_existing: 若为 true，则即使已存在也会把所需字段移至最前；
///   若为 false，则仅在缺失时追加，保留既有顺序。
pub(crate) fn ensure_required_fields(
    fields_named: &mut FieldsNamed,
    required: &[(&str, &Type)],
    reposition_existing: bool,
) {
    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    let is_required = |f: &Field| {
        f.ident
            .as_ref()
            .map(|i| required.iter().any(|(n, _)| i == n))
            .unwrap_or(false)
    };

    for (name, ty) in required.iter() {
        let existing = old_named
            .iter()
            .find(|f| f.ident.as_ref().map(|i| i == *name).unwrap_or(false));
        match existing {
            Some(f) if reposition_existing => new_named.push(f.clone()),
            Some(_) => {}
            None => {
                let ident = syn::Ident::new(name, proc_macro2::Span::call_site());
                new_named.push(syn::parse_quote! { #ident: #ty });
            }
        }
    }

    // 其余字段保持原始顺序
    for f in old_named.into_iter() {
        if !(reposition_existing && is_required(&f)) {
            new_named.push(f);
        }
    }

    fields_named.named = new_named;
}
