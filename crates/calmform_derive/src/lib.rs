use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input};

#[proc_macro_derive(FormModel, attributes(form))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

#[derive(Clone, Copy)]
enum RenameRule {
    None,
    CamelCase,
}

impl RenameRule {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        match value.value().as_str() {
            "camelCase" => Ok(RenameRule::CamelCase),
            "snake_case" => Ok(RenameRule::None),
            other => Err(syn::Error::new_spanned(
                value,
                format!(
                    "unsupported rename_all rule `{other}`, expected \"camelCase\" or \"snake_case\""
                ),
            )),
        }
    }

    fn apply(self, field: &str) -> String {
        match self {
            RenameRule::None => field.to_string(),
            RenameRule::CamelCase => to_camel_case(field),
        }
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        ));
    }

    let rename_all = container_rename(&input.attrs)?;
    let model_ident = input.ident;
    let fields_struct_ident = format_ident!("{model_ident}Fields");

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return Err(syn::Error::new(
                    Span::call_site(),
                    "FormModel derive requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                Span::call_site(),
                "FormModel derive is only supported on structs",
            ));
        }
    };

    let calmform = calmform_path();
    let mut lens_defs = Vec::new();
    let mut fields_methods = Vec::new();
    let mut idents = Vec::new();
    let mut types = Vec::new();
    let mut keys = Vec::new();

    for field in named_fields {
        let Some(field_ident) = field.ident else {
            continue;
        };
        let field_ty = field.ty;
        let rust_name = field_ident.unraw().to_string();
        let field_key = match field_rename(&field.attrs)? {
            Some(name) => name,
            None => rename_all.apply(&rust_name),
        };
        let lens_ident = format_ident!("{model_ident}{}Lens", to_pascal_case(&rust_name));

        lens_defs.push(quote! {
            #[derive(Clone, Copy, Debug, Default)]
            pub struct #lens_ident;

            impl #calmform::form::FieldLens<#model_ident> for #lens_ident {
                type Value = #field_ty;

                fn key(self) -> #calmform::form::FieldKey {
                    #calmform::form::FieldKey::new(#field_key)
                }

                fn get<'a>(self, model: &'a #model_ident) -> &'a Self::Value {
                    &model.#field_ident
                }

                fn set(self, model: &mut #model_ident, value: Self::Value) {
                    model.#field_ident = value;
                }
            }
        });

        fields_methods.push(quote! {
            pub const fn #field_ident(&self) -> #lens_ident {
                #lens_ident
            }
        });

        idents.push(field_ident);
        types.push(field_ty);
        keys.push(field_key);
    }

    Ok(quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_struct_ident;

        impl #fields_struct_ident {
            #(#fields_methods)*
        }

        impl #calmform::form::FormModel for #model_ident {
            type Fields = #fields_struct_ident;

            fn fields() -> Self::Fields {
                #fields_struct_ident
            }

            fn to_state(&self) -> #calmform::form::FormState {
                let mut __calmform_state = #calmform::form::FormState::new();
                #(
                    __calmform_state.insert(
                        #calmform::form::FieldKey::new(#keys),
                        #calmform::form::FieldType::into_value(
                            ::core::clone::Clone::clone(&self.#idents),
                        ),
                    );
                )*
                __calmform_state
            }

            fn from_state(
                __calmform_state: &#calmform::form::FormState,
            ) -> ::core::result::Result<Self, #calmform::form::FieldErrors> {
                let mut __calmform_errors = #calmform::form::FieldErrors::new();
                #(
                    let #idents = match __calmform_state
                        .decode::<#types>(#calmform::form::FieldKey::new(#keys))
                    {
                        ::core::result::Result::Ok(value) => ::core::option::Option::Some(value),
                        ::core::result::Result::Err(error) => {
                            __calmform_errors.push(#calmform::form::FieldKey::new(#keys), error);
                            ::core::option::Option::None
                        }
                    };
                )*
                #(
                    let ::core::option::Option::Some(#idents) = #idents else {
                        return ::core::result::Result::Err(__calmform_errors);
                    };
                )*
                ::core::result::Result::Ok(Self { #(#idents),* })
            }
        }

        #(#lens_defs)*
    })
}

fn container_rename(attrs: &[Attribute]) -> syn::Result<RenameRule> {
    let mut rule = RenameRule::None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("form")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                rule = RenameRule::parse(&meta.value()?.parse()?)?;
                Ok(())
            } else {
                Err(meta.error("unsupported form container attribute"))
            }
        })?;
    }
    Ok(rule)
}

fn field_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("form")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported form field attribute"))
            }
        })?;
    }
    Ok(rename)
}

fn calmform_path() -> TokenStream2 {
    match crate_name("calmform") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::calmform),
    }
}

fn to_pascal_case(input: &str) -> String {
    let mut out = String::new();
    for segment in input.split('_') {
        if segment.is_empty() {
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn to_camel_case(input: &str) -> String {
    let pascal = to_pascal_case(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
