//! spark-table 过程宏入口。
//!
//! # 设计意图（Why）
//! - 将记录形状的描述下沉到编译期：字段顺序、名称、类别与可写性一次生成为 `static`，
//!   解码时无需任何运行时类型检查；
//! - 可写性沿用可见性语义：`pub`（含 `pub(crate)` 等受限可见性）字段可写，私有字段跳过。
//!
//! # 集成方式（How）
//! - 业务 crate 依赖 `spark-table` 并启用默认的 `derive` 特性，即可 `#[derive(Record)]`；
//! - 字段属性 `#[table(skip)]` 强制跳过一个 `pub` 字段，`#[table(rename = "...")]` 改写错误信息中的字段名；
//! - 生成代码以 `::spark_table` 绝对路径引用运行时类型。

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Error, Index, LitStr, Member, Visibility,
    parse_macro_input, spanned::Spanned,
};

/// 为结构体生成 `spark_table::Record` 实现。
///
/// # 语义说明（What）
/// - **输入**：具名字段结构体、元组结构体或单元结构体，不接受泛型参数；
/// - **输出**：`shape()` 返回静态 `RecordShape`，`field_slot()` 以 `match` 把下标映射到字段句柄；
///   另生成 `FieldValue` 实现（类别 `FieldKind::Record`），使记录可作为其他记录的字段并在解码时报告类别错误；
/// - **前置条件**：每个可写字段的类型实现 `spark_table::FieldValue`；私有或跳过的字段不受此约束。
///
/// # 风险提示（Trade-offs）
/// - 形状存放在 `static` 中，因此暂不支持泛型结构体；
/// - 枚举与联合体没有固定的字段序列，直接拒绝。
#[proc_macro_derive(Record, attributes(table))]
pub fn derive_record(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand_record(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn expand_record(input: DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "#[derive(Record)] 暂不支持带泛型参数的结构体",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(Error::new(
                data.enum_token.span(),
                "#[derive(Record)] 仅支持结构体",
            ));
        }
        Data::Union(data) => {
            return Err(Error::new(
                data.union_token.span(),
                "#[derive(Record)] 仅支持结构体",
            ));
        }
    };

    let mut descriptors = Vec::new();
    let mut slot_arms = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let attrs = parse_field_attrs(&field.attrs)?;
        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(index)),
        };
        let name = match (attrs.rename, &field.ident) {
            (Some(rename), _) => rename,
            (None, Some(ident)) => ident.unraw().to_string(),
            (None, None) => index.to_string(),
        };

        let settable = !attrs.skip && !matches!(field.vis, Visibility::Inherited);
        if settable {
            let ty = &field.ty;
            descriptors.push(quote! {
                ::spark_table::FieldDescriptor::settable(
                    #name,
                    <#ty as ::spark_table::FieldValue>::KIND,
                )
            });
            slot_arms.push(quote! {
                #index => ::core::option::Option::Some(
                    ::spark_table::FieldValue::slot(&mut self.#member),
                )
            });
        } else {
            descriptors.push(quote! {
                ::spark_table::FieldDescriptor::skipped(#name)
            });
        }
    }

    let ident = &input.ident;
    let type_name = ident.unraw().to_string();
    let expanded = quote! {
        impl ::spark_table::Record for #ident {
            fn shape(&self) -> ::core::option::Option<&'static ::spark_table::RecordShape> {
                static SHAPE: ::spark_table::RecordShape = ::spark_table::RecordShape::new(
                    #type_name,
                    &[#(#descriptors),*],
                );
                ::core::option::Option::Some(&SHAPE)
            }

            fn field_slot(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<::spark_table::FieldSlot<'_>> {
                match index {
                    #(#slot_arms,)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::spark_table::FieldValue for #ident {
            const KIND: ::spark_table::FieldKind = ::spark_table::FieldKind::Record;

            fn slot(&mut self) -> ::spark_table::FieldSlot<'_> {
                ::spark_table::FieldSlot::Dynamic {
                    kind: <Self as ::spark_table::FieldValue>::KIND,
                    value: self,
                }
            }
        }
    };

    Ok(expanded)
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    rename: Option<String>,
}

fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs, Error> {
    let mut parsed = FieldAttrs::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("table")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                parsed.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("#[table(...)] 仅支持 skip 与 rename = \"...\""))
            }
        })?;
    }
    Ok(parsed)
}
