//! Type declaration rendering.

/// Renders an `export type` declaration from resolved `(field, type)` pairs.
///
/// ```rust
/// use fyrest_lib::codegen::render_type_declaration;
///
/// let declaration = render_type_declaration("Tag", &[("label", "string".to_string())]);
/// assert_eq!(declaration, "export type Tag = {\n  label: string;\n};");
/// assert_eq!(render_type_declaration("Empty", &[]), "export type Empty = {};");
/// ```
pub fn render_type_declaration(name: &str, fields: &[(&str, String)]) -> String {
    if fields.is_empty() {
        return format!("export type {name} = {{}};");
    }
    let body: String = fields
        .iter()
        .map(|(field, ts_type)| format!("  {field}: {ts_type};\n"))
        .collect();
    format!("export type {name} = {{\n{body}}};")
}
