//! Fetch function templates.
//!
//! One template per request shape: query-string GET, JSON body and
//! multipart `FormData`. [`render_route_function`] picks the template from
//! the entry's method and file flag.

use crate::config::RestConfig;
use crate::route::RouteEntry;

/// Renders the client function of a route.
pub fn render_route_function(entry: &RouteEntry, config: &RestConfig) -> String {
    if entry.method.is_get() {
        render_get_function(entry, config)
    } else if entry.accepts_files {
        render_multipart_function(entry, config)
    } else {
        render_json_function(entry, config)
    }
}

/// Renders a GET function; `params` become the query string.
pub fn render_get_function(entry: &RouteEntry, config: &RestConfig) -> String {
    let response_type = &entry.response_type;
    format!(
        "export async function {name}({params}): Promise<{response_type}> {{\n\
        \x20   const queryParams = Object.entries(params).map(([key, value]) => `${{encodeURIComponent(key)}}=${{encodeURIComponent(value)}}`).join('&');\n\
        \x20   const url = {url} + (queryParams ? `?${{queryParams}}` : '');\n\
        \x20   const response = await fetch(url, {{\n\
        \x20       method: '{method}',\n\
        \x20       {headers}\n\
        \x20   }});\n\
        \x20   return (await response.json()) as {response_type};\n\
        }}",
        name = entry.function_name(),
        params = parameter_list(entry, false),
        url = url_literal(entry, config),
        method = entry.method,
        headers = headers(config, true),
    )
}

/// Renders a function sending `params` as a JSON body.
pub fn render_json_function(entry: &RouteEntry, config: &RestConfig) -> String {
    let response_type = &entry.response_type;
    format!(
        "export async function {name}({params}): Promise<{response_type}> {{\n\
        \x20   const url = {url};\n\
        \x20   const response = await fetch(url, {{\n\
        \x20       method: '{method}',\n\
        \x20       {headers},\n\
        \x20       body: JSON.stringify(params)\n\
        \x20   }});\n\
        \x20   return (await response.json()) as {response_type};\n\
        }}",
        name = entry.function_name(),
        params = parameter_list(entry, false),
        url = url_literal(entry, config),
        method = entry.method,
        headers = headers(config, true),
    )
}

/// Renders a function sending `params` and `files` as multipart form data.
///
/// No content type is set so the browser can add the multipart boundary.
pub fn render_multipart_function(entry: &RouteEntry, config: &RestConfig) -> String {
    let response_type = &entry.response_type;
    format!(
        "export async function {name}({params}): Promise<{response_type}> {{\n\
        \x20   const formData = new FormData();\n\
        \x20   Object.entries(params).forEach(([key, value]) => formData.append(key, value));\n\
        \x20   Object.entries(files).forEach(([key, file]) => formData.append(key, file));\n\
        \x20   const url = {url};\n\
        \x20   const response = await fetch(url, {{\n\
        \x20       method: '{method}',\n\
        \x20       {headers},\n\
        \x20       body: formData\n\
        \x20   }});\n\
        \x20   return (await response.json()) as {response_type};\n\
        }}",
        name = entry.function_name(),
        params = parameter_list(entry, true),
        url = url_literal(entry, config),
        method = entry.method,
        headers = headers(config, false),
    )
}

fn parameter_list(entry: &RouteEntry, with_files: bool) -> String {
    let mut params: Vec<String> = entry
        .params
        .iter()
        .map(|param| format!("{}: {}", param.name, param.ts_type()))
        .collect();
    params.push("params: { [key: string]: any }".to_string());
    if with_files {
        params.push("files: { [key: string]: File | Blob }".to_string());
    }
    params.join(", ")
}

fn url_literal(entry: &RouteEntry, config: &RestConfig) -> String {
    let base_url = config.base_url.trim_end_matches('/');
    format!("`{base_url}{}`", entry.client_template)
}

fn headers(config: &RestConfig, json: bool) -> String {
    let content_type = if json {
        r#""Content-Type": "application/json", "#
    } else {
        ""
    };
    format!(
        r#"headers: new Headers({{{content_type}"{request_id}": uuidv4(), "{session}": {variable}}})"#,
        request_id = config.headers.request_id,
        session = config.headers.session,
        variable = config.session_variable,
    )
}
