use proc_macro::TokenStream;
use quote::quote;
use syn::parse::Parser;

/// Generate a color model struct.
///
/// The first 3 fields are the components of the color. Any fields after them
/// are context the model needs for conversion (a reference white point, a
/// linearity tag) and are passed to `new` after alpha.
#[proc_macro]
pub fn gen_model(input: TokenStream) -> TokenStream {
    let mut input = syn::parse_macro_input!(input as syn::ItemStruct);

    if input.fields.len() < 3 {
        return quote! {
            compile_error!("Models must start with 3 fields, one for each component of the color.")
        }
        .into();
    }

    let syn::Fields::Named(ref mut named) = input.fields else {
        return quote! {
            compile_error!("Models must use named fields.")
        }
        .into();
    };

    // Every field of a model is public.
    named.named.iter_mut().for_each(|f| {
        f.vis = syn::Visibility::Public(Default::default());
    });

    let field_names = named
        .named
        .iter()
        .map(|f| f.ident.clone())
        .collect::<Vec<_>>();
    let field_types = named.named.iter().map(|f| f.ty.clone()).collect::<Vec<_>>();

    let field1 = &field_names[0];
    let field2 = &field_names[1];
    let field3 = &field_names[2];
    let context_names = &field_names[3..];
    let context_types = &field_types[3..];

    named.named.push(
        syn::Field::parse_named
            .parse2(quote! {
                /// The alpha component of the color.
                pub alpha: crate::color::Component
            })
            .unwrap(),
    );

    let attr = syn::Attribute::parse_outer
        .parse2(quote! {
            #[derive(Clone, Copy, Debug, PartialEq)]
        })
        .unwrap();
    input.attrs.extend(attr);

    let struct_name = input.ident.clone();

    let new_impl = quote! {
        impl #struct_name {
            /// Create a new color in this model.
            #[allow(clippy::too_many_arguments)]
            pub fn new(
                #field1: crate::color::Component,
                #field2: crate::color::Component,
                #field3: crate::color::Component,
                alpha: crate::color::Component,
                #(#context_names: #context_types,)*
            ) -> Self {
                Self {
                    #field1,
                    #field2,
                    #field3,
                    alpha,
                    #(#context_names,)*
                }
            }

            /// Convert this model into generic components.
            pub fn to_components(&self) -> crate::color::Components {
                crate::color::Components(self.#field1, self.#field2, self.#field3)
            }

            /// Return a copy of this color with a different alpha.
            pub fn with_alpha(self, alpha: crate::color::Component) -> Self {
                Self { alpha, ..self }
            }
        }

        impl crate::models::Vector for #struct_name {
            fn to_vector(&self) -> [crate::color::Component; 4] {
                [self.#field1, self.#field2, self.#field3, self.alpha]
            }
        }
    };

    // Models without context can be built straight from a vector.
    let from_impl = if context_names.is_empty() {
        quote! {
            impl From<[crate::color::Component; 4]> for #struct_name {
                fn from(value: [crate::color::Component; 4]) -> Self {
                    Self::new(value[0], value[1], value[2], value[3])
                }
            }
        }
    } else {
        quote! {}
    };

    quote! {
        #input
        #new_impl
        #from_impl
    }
    .into()
}
