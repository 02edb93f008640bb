//! Type and operator name mapping.
//!
//! The mapping is the authoritative semantics for the string-typed
//! names the AST carries: `int -> int`, `float -> double`,
//! `string -> std::string`, `bool -> bool`, `void -> void`; anything
//! else passes through for the host compiler to judge.

/// Map an L++ type name to its C++ spelling.
///
/// # Examples
///
/// ```
/// use lppc_gen::types::map_type;
///
/// assert_eq!(map_type("float"), "double");
/// assert_eq!(map_type("string"), "std::string");
/// assert_eq!(map_type("Widget"), "Widget");
/// ```
pub fn map_type(lpp_type: &str) -> String {
    // Mutability markers are analysis-facing only.
    let ty = lpp_type.strip_prefix("mut ").unwrap_or(lpp_type);

    match ty {
        "int" => "int".to_string(),
        "float" => "double".to_string(),
        "string" => "std::string".to_string(),
        "bool" => "bool".to_string(),
        "void" => "void".to_string(),
        "auto" => "auto".to_string(),
        other => other.to_string(),
    }
}

/// Map word-form operators to their C++ spelling.
pub fn map_operator(op: &str) -> &str {
    match op {
        "and" => "&&",
        "or" => "||",
        "not" => "!",
        other => other,
    }
}

/// Convert an interface method signature string to a C++ declaration.
///
/// `"add(int, int) -> int"` becomes `"int add(int, int)"`.
pub fn convert_method_signature(signature: &str) -> String {
    let Some(arrow) = signature.find(" -> ") else {
        return signature.to_string();
    };
    let name_and_params = &signature[..arrow];
    let return_type = &signature[arrow + 4..];

    let Some(paren) = name_and_params.find('(') else {
        return signature.to_string();
    };
    let method_name = &name_and_params[..paren];
    let params = &name_and_params[paren + 1..name_and_params.len() - 1];

    let mapped_params: Vec<String> = if params.is_empty() {
        Vec::new()
    } else {
        params.split(", ").map(map_type).collect()
    };

    format!(
        "{} {}({})",
        map_type(return_type),
        method_name,
        mapped_params.join(", ")
    )
}
