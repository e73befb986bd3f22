//! `#[contract]` attribute macro.
//!
//! Turns a contract trait into:
//! * the trait itself, markers stripped and a setter added per property
//! * a static `ContractDef` registered through `inventory`
//! * an adapter struct forwarding every member to `Proxy::invoke`

use std::collections::HashSet;

use heck::{ToShoutySnakeCase, ToUpperCamelCase};
use proc_macro::TokenStream;
use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::{ToTokens, format_ident, quote};
use syn::ext::IdentExt;
use syn::{Attribute, FnArg, Ident, ItemTrait, LitStr, Meta, Pat, ReturnType, Signature, TraitItem, TraitItemFn, Type, parse_macro_input, parse_quote};

#[derive(Default)]
struct ContractArgs {
	name: Option<LitStr>,
	adapter: Option<Ident>,
}

struct Property {
	ident: Ident,
	ty: Type,
	watched: bool,
}

impl Property {
	fn name(&self) -> String {
		self.ident.unraw().to_string()
	}
}

struct Method {
	sig: Signature,
	member: String,
	args: Vec<Ident>,
	is_async: bool,
}

pub fn contract(attr: TokenStream, item: TokenStream) -> TokenStream {
	let mut args = ContractArgs::default();
	let parser = syn::meta::parser(|meta| {
		if meta.path.is_ident("name") {
			args.name = Some(meta.value()?.parse()?);
			Ok(())
		} else if meta.path.is_ident("adapter") {
			args.adapter = Some(meta.value()?.parse()?);
			Ok(())
		} else {
			Err(meta.error("unknown contract attribute"))
		}
	});
	parse_macro_input!(attr with parser);

	let item = parse_macro_input!(item as ItemTrait);
	expand(args, item).unwrap_or_else(syn::Error::into_compile_error).into()
}

fn expand(args: ContractArgs, mut item: ItemTrait) -> syn::Result<TokenStream2> {
	if !item.generics.params.is_empty() || item.generics.where_clause.is_some() {
		return Err(syn::Error::new_spanned(&item.generics, "contracts cannot be generic"));
	}

	let trait_ident = item.ident.clone();
	let vis = item.vis.clone();
	let name = args.name.map_or_else(|| trait_ident.unraw().to_string(), |lit| lit.value());
	let adapter = args.adapter.unwrap_or_else(|| format_ident!("{}Proxy", trait_ident));
	let def_ident = format_ident!("{}_CONTRACT", trait_ident.unraw().to_string().to_shouty_snake_case());

	let mut properties = Vec::new();
	let mut methods = Vec::new();
	let mut members = HashSet::new();
	let mut rust_names = HashSet::new();

	for trait_item in &mut item.items {
		let TraitItem::Fn(func) = trait_item else {
			return Err(syn::Error::new_spanned(trait_item, "contracts may only declare methods"));
		};
		let marker = take_marker(&mut func.attrs)?;
		check_shape(func)?;
		claim(&mut rust_names, func.sig.ident.unraw().to_string(), &func.sig.ident)?;

		match marker {
			Some(watched) => {
				let prop = property(func, watched)?;
				let name = prop.name();
				claim(&mut rust_names, format!("set_{name}"), &func.sig.ident)?;
				claim(&mut members, format!("get_{name}"), &func.sig.ident)?;
				claim(&mut members, format!("set_{name}"), &func.sig.ident)?;
				properties.push(prop);
			}
			None => {
				let method = method(func)?;
				claim(&mut members, method.member.clone(), &func.sig.ident)?;
				methods.push(method);
			}
		}
	}

	for prop in &properties {
		let ident = &prop.ident;
		let ty = &prop.ty;
		let setter = format_ident!("set_{}", ident.unraw());
		let doc = format!(" Writes [`{}`](Self::{ident}).", prop.name());
		item.items.push(parse_quote! {
			#[doc = #doc]
			fn #setter(&self, value: #ty) -> ::standin::Result<()>;
		});
	}

	let prop_defs = properties.iter().map(|prop| {
		let name = prop.name();
		let ty = &prop.ty;
		let watched = prop.watched;
		quote! {
			::standin::PropertyDef {
				name: #name,
				value_type: <#ty as ::standin::PropertyType>::value_type,
				watched: #watched,
			}
		}
	});

	let method_defs = methods.iter().map(|method| {
		let member = &method.member;
		let arity = method.args.len();
		let is_async = method.is_async;
		quote! {
			::standin::MethodDef { name: #member, arity: #arity, is_async: #is_async }
		}
	});

	let accessors = properties.iter().map(|prop| {
		let ident = &prop.ident;
		let ty = &prop.ty;
		let setter = format_ident!("set_{}", ident.unraw());
		let getter_member = format!("get_{}", prop.name());
		let setter_member = format!("set_{}", prop.name());
		quote! {
			fn #ident(&self) -> #ty {
				::standin::adapter::read::<#ty>(&self.proxy, #getter_member)
			}

			fn #setter(&self, value: #ty) -> ::standin::Result<()> {
				::standin::adapter::write::<#ty>(&self.proxy, #setter_member, value)
			}
		}
	});

	let commands = methods.iter().map(|method| {
		let sig = &method.sig;
		let member = &method.member;
		let args = &method.args;
		let entry = if method.is_async {
			format_ident!("call_async")
		} else {
			format_ident!("call")
		};
		quote! {
			#sig {
				::standin::adapter::#entry(
					&self.proxy,
					#member,
					::std::vec![#(::standin::PropertyType::into_value(#args)),*],
				)
			}
		}
	});

	let def_doc = format!(" Declaration of the `{name}` contract.");
	let adapter_doc = format!(" Runtime stand-in implementing [`{trait_ident}`].");

	Ok(quote! {
		#item

		#[doc = #def_doc]
		#vis static #def_ident: ::standin::ContractDef = ::standin::ContractDef {
			name: #name,
			properties: &[#(#prop_defs),*],
			methods: &[#(#method_defs),*],
		};

		::standin::__private::inventory::submit! {
			::standin::ContractReg(&#def_ident)
		}

		#[doc = #adapter_doc]
		#[derive(Clone, Debug, PartialEq)]
		#vis struct #adapter {
			proxy: ::standin::Proxy,
		}

		impl #adapter {
			/// Creates an instance through the global factory.
			#vis fn new() -> Self {
				::standin::adapter::create::<Self>()
			}
		}

		impl ::std::default::Default for #adapter {
			fn default() -> Self {
				Self::new()
			}
		}

		impl ::std::ops::Deref for #adapter {
			type Target = ::standin::Proxy;

			fn deref(&self) -> &::standin::Proxy {
				&self.proxy
			}
		}

		impl ::standin::ContractType for #adapter {
			fn definition() -> &'static ::standin::ContractDef {
				&#def_ident
			}

			fn from_proxy(proxy: ::standin::Proxy) -> Self {
				Self { proxy }
			}

			fn proxy(&self) -> &::standin::Proxy {
				&self.proxy
			}

			fn into_proxy(self) -> ::standin::Proxy {
				self.proxy
			}
		}

		impl #trait_ident for #adapter {
			#(#accessors)*
			#(#commands)*
		}

		impl ::standin::PropertyType for #adapter {
			fn value_type() -> ::standin::ValueType {
				::standin::ValueType::contract(#name)
			}

			fn into_value(self) -> ::standin::Value {
				::standin::Value::Contract(self.proxy)
			}

			fn from_value(value: ::standin::Value) -> Self {
				::standin::adapter::contract_from_value::<Self>(value)
			}
		}

		impl ::standin::__private::serde::Serialize for #adapter {
			fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
			where
				S: ::standin::__private::serde::Serializer,
			{
				::standin::Bridge::global().encode(&self.proxy, serializer)
			}
		}

		impl<'de> ::standin::__private::serde::Deserialize<'de> for #adapter {
			fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
			where
				D: ::standin::__private::serde::Deserializer<'de>,
			{
				::standin::Bridge::global().decode_as::<Self, D>(deserializer)
			}
		}
	})
}

/// Strips `#[watch]` / `#[property]`, returning the watched flag when present.
fn take_marker(attrs: &mut Vec<Attribute>) -> syn::Result<Option<bool>> {
	let mut marker = None;
	let mut error = None;
	attrs.retain(|attr| {
		let watched = if attr.path().is_ident("watch") {
			true
		} else if attr.path().is_ident("property") {
			false
		} else {
			return true;
		};
		if !matches!(attr.meta, Meta::Path(_)) {
			error.get_or_insert_with(|| syn::Error::new_spanned(attr, "contract markers take no arguments"));
		}
		marker = Some(marker.unwrap_or(false) || watched);
		false
	});
	match error {
		Some(err) => Err(err),
		None => Ok(marker),
	}
}

fn check_shape(func: &TraitItemFn) -> syn::Result<()> {
	let sig = &func.sig;
	if func.default.is_some() {
		return Err(syn::Error::new_spanned(&func.default, "contract members cannot have default bodies"));
	}
	if sig.asyncness.is_some() {
		return Err(syn::Error::new_spanned(
			sig.asyncness,
			"declare asynchronous commands as `fn name(&self) -> standin::Result<standin::Pending>`",
		));
	}
	if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
		return Err(syn::Error::new_spanned(&sig.generics, "contract members cannot be generic"));
	}
	match sig.inputs.first() {
		Some(FnArg::Receiver(recv)) if recv.reference.is_some() && recv.mutability.is_none() => Ok(()),
		_ => Err(syn::Error::new_spanned(sig, "contract members take `&self`")),
	}
}

fn property(func: &TraitItemFn, watched: bool) -> syn::Result<Property> {
	let sig = &func.sig;
	if sig.inputs.len() != 1 {
		return Err(syn::Error::new_spanned(&sig.inputs, "properties take no arguments"));
	}
	let ReturnType::Type(_, ty) = &sig.output else {
		return Err(syn::Error::new_spanned(sig, "properties must declare their type"));
	};
	Ok(Property {
		ident: sig.ident.clone(),
		ty: (**ty).clone(),
		watched,
	})
}

fn method(func: &TraitItemFn) -> syn::Result<Method> {
	let sig = &func.sig;
	if matches!(sig.output, ReturnType::Default) {
		return Err(syn::Error::new_spanned(
			sig,
			"commands return `standin::Result<()>` or `standin::Result<standin::Pending>`",
		));
	}

	let args = sig
		.inputs
		.iter()
		.skip(1)
		.map(|arg| match arg {
			FnArg::Typed(typed) => match &*typed.pat {
				Pat::Ident(pat) => Ok(pat.ident.clone()),
				other => Err(syn::Error::new_spanned(other, "command arguments must be plain identifiers")),
			},
			FnArg::Receiver(recv) => Err(syn::Error::new_spanned(recv, "unexpected receiver")),
		})
		.collect::<syn::Result<Vec<_>>>()?;

	Ok(Method {
		sig: sig.clone(),
		member: sig.ident.unraw().to_string().to_upper_camel_case(),
		args,
		is_async: returns_pending(&sig.output),
	})
}

/// A command is asynchronous iff its return type mentions `Pending`.
fn returns_pending(output: &ReturnType) -> bool {
	fn mentions(tokens: TokenStream2) -> bool {
		tokens.into_iter().any(|tt| match tt {
			TokenTree::Ident(ident) => ident == "Pending",
			TokenTree::Group(group) => mentions(group.stream()),
			TokenTree::Punct(_) | TokenTree::Literal(_) => false,
		})
	}
	match output {
		ReturnType::Type(_, ty) => mentions(ty.to_token_stream()),
		ReturnType::Default => false,
	}
}

fn claim(seen: &mut HashSet<String>, name: String, span: &Ident) -> syn::Result<()> {
	if seen.insert(name.clone()) {
		return Ok(());
	}
	Err(syn::Error::new_spanned(span, format!("`{name}` is declared more than once in this contract")))
}
