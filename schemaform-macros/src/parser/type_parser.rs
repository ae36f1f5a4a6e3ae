//! Type inspection helpers.

use syn::{GenericArgument, PathArguments, Type};

/// Returns `T` when `ty` is `Option<T>` (also `std::option::Option<T>`).
pub fn option_inner(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let segment = type_path.path.segments.last()?;
            if segment.ident != "Option" {
                return None;
            }
            let PathArguments::AngleBracketed(args) = &segment.arguments else {
                return None;
            };
            match args.args.first()? {
                GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
                _ => None,
            }
        }
        Type::Paren(paren) => option_inner(&paren.elem),
        Type::Group(group) => option_inner(&group.elem),
        _ => None,
    }
}
